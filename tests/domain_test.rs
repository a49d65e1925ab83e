//! Domain-rule tests: vouchers, quotes, templates, job lifecycle, and
//! storage-key conventions.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use uuid::Uuid;

use studio_portal::domain::{
    compute_quote, draft_file_key, job_file_key, DiscountKind, EmailTemplate, JobStatus,
    PricingTier, ProductPricing, Voucher,
};
use studio_portal::errors::AppError;

fn voucher(kind: DiscountKind, value: i64) -> Voucher {
    let now = Utc::now();
    Voucher {
        id: Uuid::new_v4(),
        code: "SPRING".to_string(),
        kind,
        value,
        max_uses: 3,
        used_count: 0,
        valid_from: now - Duration::days(1),
        valid_until: now + Duration::days(30),
        active: true,
        created_at: now,
        updated_at: now,
    }
}

fn product(base_cents: i64) -> ProductPricing {
    let now = Utc::now();
    ProductPricing {
        id: Uuid::new_v4(),
        product_key: "business-cards".to_string(),
        display_name: "Business cards".to_string(),
        base_price_cents: base_cents,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

fn tier(product_id: Uuid, min_quantity: i32, unit_cents: i64) -> PricingTier {
    let now = Utc::now();
    PricingTier {
        id: Uuid::new_v4(),
        product_id,
        min_quantity,
        unit_price_cents: unit_cents,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Voucher Rules
// =============================================================================

#[test]
fn voucher_percent_and_fixed_discounts() {
    assert_eq!(voucher(DiscountKind::Percent, 25).discount_for(1000), 250);
    assert_eq!(voucher(DiscountKind::Fixed, 300).discount_for(1000), 300);
    // Fixed discount never exceeds the subtotal
    assert_eq!(voucher(DiscountKind::Fixed, 5000).discount_for(1000), 1000);
}

#[test]
fn voucher_validity_window() {
    let now = Utc::now();
    let mut v = voucher(DiscountKind::Percent, 10);
    assert!(v.is_valid_at(now));

    v.valid_until = now - Duration::seconds(1);
    assert!(!v.is_valid_at(now));

    let mut v = voucher(DiscountKind::Percent, 10);
    v.used_count = v.max_uses;
    assert!(!v.is_valid_at(now));
}

// =============================================================================
// Quote Computation
// =============================================================================

#[test]
fn quote_selects_highest_applicable_tier() {
    let p = product(500);
    let tiers = vec![tier(p.id, 1, 20), tier(p.id, 250, 12), tier(p.id, 1000, 8)];

    let quote = compute_quote(&p, &tiers, 500, None).unwrap();
    assert_eq!(quote.unit_price_cents, 12);
    assert_eq!(quote.subtotal_cents, 500 + 12 * 500);

    let quote = compute_quote(&p, &tiers, 1000, None).unwrap();
    assert_eq!(quote.unit_price_cents, 8);
}

#[test]
fn quote_applies_voucher_once() {
    let p = product(0);
    let tiers = vec![tier(p.id, 1, 10)];
    let v = voucher(DiscountKind::Percent, 50);

    let quote = compute_quote(&p, &tiers, 100, Some(&v)).unwrap();
    assert_eq!(quote.subtotal_cents, 1000);
    assert_eq!(quote.discount_cents, 500);
    assert_eq!(quote.total_cents, 500);
}

#[test]
fn quote_rejects_uncovered_quantity() {
    let p = product(500);
    let tiers = vec![tier(p.id, 100, 10)];

    let err = compute_quote(&p, &tiers, 50, None).unwrap_err();
    assert!(matches!(err, AppError::Unprocessable(_)));
}

// =============================================================================
// Template Rendering
// =============================================================================

#[test]
fn template_renders_all_placeholders() {
    let now = Utc::now();
    let template = EmailTemplate {
        id: Uuid::new_v4(),
        template_key: "order-confirmation".to_string(),
        subject: "Order {{order_id}} confirmed".to_string(),
        body_html: "<p>Thanks {{name}}, total {{total}}.</p>".to_string(),
        body_text: "Thanks {{name}}, total {{total}}.".to_string(),
        created_at: now,
        updated_at: now,
    };

    let vars = HashMap::from([
        ("order_id".to_string(), "42".to_string()),
        ("name".to_string(), "Ada".to_string()),
        ("total".to_string(), "$36.00".to_string()),
    ]);

    let rendered = template.render(&vars).unwrap();
    assert_eq!(rendered.subject, "Order 42 confirmed");
    assert_eq!(rendered.body_text, "Thanks Ada, total $36.00.");

    // A missing variable is a hard error, not silent passthrough
    let err = template.render(&HashMap::new()).unwrap_err();
    assert!(matches!(err, AppError::Unprocessable(_)));
}

// =============================================================================
// Job Lifecycle
// =============================================================================

#[test]
fn job_lifecycle_is_ordered() {
    let path = [
        JobStatus::Draft,
        JobStatus::Submitted,
        JobStatus::InProgress,
        JobStatus::InReview,
        JobStatus::Completed,
    ];

    for pair in path.windows(2) {
        assert!(
            pair[0].can_transition(pair[1]),
            "{} -> {} should be legal",
            pair[0],
            pair[1]
        );
    }

    // No skipping ahead, no resurrecting closed jobs
    assert!(!JobStatus::Draft.can_transition(JobStatus::Completed));
    assert!(!JobStatus::Cancelled.can_transition(JobStatus::Submitted));
    assert!(!JobStatus::Completed.can_transition(JobStatus::Cancelled));
}

// =============================================================================
// Storage Keys
// =============================================================================

#[test]
fn storage_keys_follow_conventions() {
    let key = draft_file_key("3f2a9c", "../sneaky name.pdf");
    assert_eq!(key, "drafts/3f2a9c/sneaky_name.pdf");

    let job_id = Uuid::new_v4();
    let key = job_file_key(job_id, "final.pdf");
    assert!(key.starts_with(&format!("jobs/{}/", job_id)));
}

// Registry fixtures used across the test suite.

use crate::registry::{StepDescriptor, StepRegistry};
use serde_json::json;

/// Three-step onboarding flow: account, optional profile, review
pub fn onboarding_registry() -> StepRegistry {
    StepRegistry::new(vec![
        StepDescriptor::new("account", "Account details").with_fields(["email", "password"]),
        StepDescriptor::new("profile", "Profile")
            .with_fields(["display_name"])
            .optional(),
        StepDescriptor::new("review", "Review & confirm"),
    ])
    .expect("onboarding fixture is valid")
}

/// Five-step checkout flow with an optional and a disabled step
pub fn checkout_registry() -> StepRegistry {
    StepRegistry::new(vec![
        StepDescriptor::new("cart", "Cart").with_fields(["items"]),
        StepDescriptor::new("shipping", "Shipping address")
            .with_fields(["street", "city", "postal_code"]),
        StepDescriptor::new("gift", "Gift options")
            .with_fields(["gift_message"])
            .optional()
            .with_metadata(json!({"icon": "gift"})),
        StepDescriptor::new("express", "Express lane").disabled(),
        StepDescriptor::new("payment", "Payment").with_fields(["card_number"]),
    ])
    .expect("checkout fixture is valid")
}

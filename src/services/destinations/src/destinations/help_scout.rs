//! Help Scout customer mapping
//!
//! Builds the customer update body from an identify event:
//! - scalar traits copied through when present
//! - `website`/`websites` and `phone`/`phones` folded into value lists,
//!   with the singular trait taking precedence over the plural one
//! - a postal address, only when every component is known
//!
//! http://developer.helpscout.net/customers/update/

use super::{Destination, DestinationMapper};
use crate::error::MappingResult;
use crate::models::{Address, ContactUpdatePayload, EmailEntry, PhoneEntry, WebsiteEntry};
use destination_shared::{EventFacade, Identify, Resolved};
use serde_json::Value;
use tracing::debug;

/// Location attached to every phone entry
pub const DEFAULT_PHONE_LOCATION: &str = "mobile";

/// Help Scout mapper
#[derive(Debug, Clone, Default)]
pub struct HelpScoutMapper;

impl HelpScoutMapper {
    pub fn new() -> Self {
        Self
    }
}

impl DestinationMapper for HelpScoutMapper {
    fn destination(&self) -> Destination {
        Destination::HelpScout
    }

    fn map_identify(&self, identify: &Identify) -> MappingResult<Value> {
        Ok(serde_json::to_value(map_identify(identify))?)
    }

    fn supported_events(&self) -> Vec<String> {
        vec!["identify".to_string()]
    }
}

/// Map an identify event to a Help Scout customer update
pub fn map_identify(identify: &Identify) -> ContactUpdatePayload {
    let trait_at = |name: &str| trait_value(identify, name);

    let organization = trait_at("organization").or_else(|| trait_at("company"));
    let photo_url = trait_at("avatar").or_else(|| trait_at("photoUrl"));

    ContactUpdatePayload {
        gender: trait_at("gender").to_value(),
        age: trait_at("age").to_value(),
        location: trait_at("location").to_value(),
        photo_url: photo_url.to_value(),
        first_name: identify.first_name(),
        last_name: identify.last_name(),
        emails: vec![EmailEntry {
            value: identify.email(),
        }],
        organization: organization.to_value(),
        job_title: trait_at("jobTitle").to_value(),
        background: trait_at("background").to_value(),
        address: format_address(identify),
        websites: collect_multiple(identify, "website", "websites")
            .map(|values| values.into_iter().map(|value| WebsiteEntry { value }).collect()),
        phones: format_phones(identify),
    }
}

fn trait_value<'a>(identify: &'a Identify, name: &str) -> Resolved<'a> {
    identify.proxy(&format!("traits.{}", name))
}

/// Singular trait as a one-element list, else the plural trait when it is a
/// list. Empty results are treated as missing.
fn collect_multiple(identify: &Identify, singular: &str, plural: &str) -> Option<Vec<Value>> {
    let single = trait_value(identify, singular);
    if single.is_present() {
        return single.to_value().map(|value| vec![value]);
    }

    match trait_value(identify, plural) {
        Resolved::List(items) if !items.is_empty() => Some(items.to_vec()),
        _ => None,
    }
}

fn format_phones(identify: &Identify) -> Option<Vec<PhoneEntry>> {
    let phones = collect_multiple(identify, "phone", "phones")?;
    Some(
        phones
            .into_iter()
            .map(|value| PhoneEntry {
                value,
                location: DEFAULT_PHONE_LOCATION.to_string(),
            })
            .collect(),
    )
}

fn address_part<'a>(identify: &'a Identify, scope: &str, name: &str) -> Resolved<'a> {
    identify.proxy(&format!("{}.{}", scope, name))
}

/// Postal address read from `traits.address.*` when `traits.address` is an
/// object, otherwise from top-level traits.
fn format_address(identify: &Identify) -> Option<Address> {
    let scope = match identify.proxy("traits.address") {
        Resolved::Mapping(_) => "traits.address",
        _ => "traits",
    };

    let postal_code = address_part(identify, scope, "zip")
        .or_else(|| address_part(identify, scope, "postalCode"));
    let city = address_part(identify, scope, "city");
    let country = address_part(identify, scope, "country");
    let state = address_part(identify, scope, "state");
    let street = address_part(identify, scope, "street");

    let parts = [
        ("postalCode", postal_code),
        ("city", city),
        ("country", country),
        ("state", state),
        ("street", street),
    ];
    if let Some((missing, _)) = parts.iter().find(|(_, part)| !part.is_present()) {
        debug!(scope, missing, "Incomplete address, omitting from customer update");
        return None;
    }

    Some(Address {
        city: city.to_value()?,
        state: state.to_value()?,
        postal_code: postal_code.to_value()?,
        country: country.to_value()?,
        lines: vec![street.to_value()?],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracing_test::traced_test;

    fn identify(traits: Value) -> Identify {
        Identify::new(json!({"type": "identify", "userId": "u1", "traits": traits})).unwrap()
    }

    fn mapped(traits: Value) -> Value {
        serde_json::to_value(map_identify(&identify(traits))).unwrap()
    }

    #[test]
    fn test_full_identify() {
        let payload = mapped(json!({
            "email": "ada@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "gender": "female",
            "age": 36,
            "location": "London",
            "avatar": "https://img/ada.png",
            "company": "Analytical Engines",
            "jobTitle": "Programmer",
            "background": "Mathematician",
            "website": "ada.dev",
            "phone": "555-1234",
            "address": {
                "street": "12 St James's Sq",
                "city": "London",
                "state": "LDN",
                "zip": "SW1Y",
                "country": "UK"
            }
        }));

        assert_eq!(
            payload,
            json!({
                "gender": "female",
                "age": 36,
                "location": "London",
                "photoUrl": "https://img/ada.png",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "emails": [{"value": "ada@example.com"}],
                "organization": "Analytical Engines",
                "jobTitle": "Programmer",
                "background": "Mathematician",
                "address": {
                    "city": "London",
                    "state": "LDN",
                    "postalCode": "SW1Y",
                    "country": "UK",
                    "lines": ["12 St James's Sq"]
                },
                "websites": [{"value": "ada.dev"}],
                "phones": [{"value": "555-1234", "location": "mobile"}]
            })
        );
    }

    #[test]
    fn test_minimal_identify_keeps_single_email_entry() {
        assert_eq!(mapped(json!({})), json!({"emails": [{}]}));
    }

    #[test]
    fn test_organization_precedence() {
        let payload = mapped(json!({"organization": "Org", "company": "Co"}));
        assert_eq!(payload["organization"], "Org");

        let payload = mapped(json!({"organization": null, "company": "Co"}));
        assert_eq!(payload["organization"], "Co");
    }

    #[test]
    fn test_photo_url_fallback() {
        let payload = mapped(json!({"photoUrl": "https://img/p.png"}));
        assert_eq!(payload["photoUrl"], "https://img/p.png");
    }

    #[test]
    fn test_falsy_values_preserved() {
        let payload = mapped(json!({"age": 0, "gender": null, "background": ""}));
        let object = payload.as_object().unwrap();

        assert_eq!(object.get("age"), Some(&json!(0)));
        assert_eq!(object.get("gender"), Some(&Value::Null));
        assert_eq!(object.get("background"), Some(&json!("")));
        assert!(!object.contains_key("location"));
    }

    #[test]
    fn test_singular_website_wins() {
        let payload = mapped(json!({"website": "a.com", "websites": ["b.com", "c.com"]}));
        assert_eq!(payload["websites"], json!([{"value": "a.com"}]));
    }

    #[test]
    fn test_plural_websites() {
        let payload = mapped(json!({"websites": ["b.com", "c.com"]}));
        assert_eq!(payload["websites"], json!([{"value": "b.com"}, {"value": "c.com"}]));

        let payload = mapped(json!({"websites": "not-a-list.com"}));
        assert!(payload.get("websites").is_none());

        let payload = mapped(json!({"websites": []}));
        assert!(payload.get("websites").is_none());
    }

    #[test]
    fn test_plural_phones_get_default_location() {
        let payload = mapped(json!({
            "phones": [
                "555-0001",
                {"value": "555-0002", "location": "work", "ext": "12"},
                {"value": "555-0003", "location": 7}
            ]
        }));

        // Elements are wrapped whole, never unpacked
        assert_eq!(
            payload["phones"],
            json!([
                {"value": "555-0001", "location": "mobile"},
                {"value": {"value": "555-0002", "location": "work", "ext": "12"}, "location": "mobile"},
                {"value": {"value": "555-0003", "location": 7}, "location": "mobile"}
            ])
        );
    }

    #[test]
    fn test_websites_never_get_location() {
        let payload = mapped(json!({"website": "a.com", "phone": "555"}));
        assert!(payload["websites"][0].get("location").is_none());
        assert_eq!(payload["phones"][0]["location"], "mobile");
    }

    #[test]
    fn test_flat_address() {
        let payload = mapped(json!({
            "street": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "postalCode": "62701",
            "country": "US"
        }));

        assert_eq!(
            payload["address"],
            json!({
                "city": "Springfield",
                "state": "IL",
                "postalCode": "62701",
                "country": "US",
                "lines": ["1 Main St"]
            })
        );
    }

    #[test]
    fn test_zip_wins_over_postal_code() {
        let flat = mapped(json!({
            "street": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "zip": "Z",
            "postalCode": "P",
            "country": "US"
        }));
        assert_eq!(flat["address"]["postalCode"], "Z");

        let nested = mapped(json!({
            "address": {
                "street": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "zip": "Z",
                "postalCode": "P",
                "country": "US"
            }
        }));
        assert_eq!(nested["address"]["postalCode"], "Z");
    }

    #[test]
    fn test_scalar_address_reads_top_level_traits() {
        let payload = mapped(json!({
            "address": "1 Main St, Springfield",
            "street": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "zip": 62701,
            "country": "US"
        }));

        assert_eq!(payload["address"]["postalCode"], json!(62701));
        assert_eq!(payload["address"]["lines"], json!(["1 Main St"]));
    }

    #[test]
    fn test_nested_address_ignores_top_level_traits() {
        let payload = mapped(json!({
            "address": {"city": "Springfield", "state": "IL", "zip": "62701", "country": "US"},
            "street": "1 Main St"
        }));

        assert!(payload.get("address").is_none());
    }

    #[traced_test]
    #[test]
    fn test_partial_address_is_omitted() {
        let payload = mapped(json!({"city": "Springfield", "state": "IL", "country": "US", "zip": "62701"}));

        assert!(payload.get("address").is_none());
        assert!(logs_contain("Incomplete address"));
    }

    #[test]
    fn test_name_split_reaches_payload() {
        let payload = mapped(json!({"name": "Grace Hopper"}));
        assert_eq!(payload["firstName"], "Grace");
        assert_eq!(payload["lastName"], "Hopper");
    }

    #[test]
    fn test_mapper_trait_rejects_track() {
        let mapper = HelpScoutMapper::new();
        let track = destination_shared::Track::new(json!({"event": "x"})).unwrap();
        let err = mapper.map_track(&track).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_EVENT");

        let body = mapper.map_identify(&identify(json!({"email": "a@b.co"}))).unwrap();
        assert_eq!(body["emails"], json!([{"value": "a@b.co"}]));
    }
}

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::core::error::FieldError;
use crate::shared::validation::{
    phone_digit_count, MIN_PHONE_DIGITS, PERSON_NAME_REGEX, PHONE_REGEX,
};

/// Service requested on the estimate form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ServiceType {
    #[serde(rename = "landscape-outdoor-lighting")]
    LandscapeOutdoorLighting,
    #[serde(rename = "pool-sauna-electrical")]
    PoolSaunaElectrical,
    #[serde(rename = "residential-electrical-services")]
    ResidentialElectricalServices,
    #[serde(rename = "commercial-electrical-solutions")]
    CommercialElectricalSolutions,
    #[serde(rename = "ev-Charger-Installation")]
    EvChargerInstallation,
    #[serde(rename = "residential-commercial-generator-installation")]
    GeneratorInstallation,
}

impl ServiceType {
    pub const ALL: [ServiceType; 6] = [
        ServiceType::LandscapeOutdoorLighting,
        ServiceType::PoolSaunaElectrical,
        ServiceType::ResidentialElectricalServices,
        ServiceType::CommercialElectricalSolutions,
        ServiceType::EvChargerInstallation,
        ServiceType::GeneratorInstallation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::LandscapeOutdoorLighting => "landscape-outdoor-lighting",
            ServiceType::PoolSaunaElectrical => "pool-sauna-electrical",
            ServiceType::ResidentialElectricalServices => "residential-electrical-services",
            ServiceType::CommercialElectricalSolutions => "commercial-electrical-solutions",
            ServiceType::EvChargerInstallation => "ev-Charger-Installation",
            ServiceType::GeneratorInstallation => "residential-commercial-generator-installation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::LandscapeOutdoorLighting => "Landscape & Outdoor Lighting",
            ServiceType::PoolSaunaElectrical => "Pool & Sauna Electrical",
            ServiceType::ResidentialElectricalServices => "Residential Electrical Services",
            ServiceType::CommercialElectricalSolutions => "Commercial Electrical Solutions",
            ServiceType::EvChargerInstallation => "EV Charger Installation",
            ServiceType::GeneratorInstallation => {
                "Residential & Commercial Generator Installation"
            }
        }
    }
}

impl FromStr for ServiceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Residential,
    Commercial,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Residential => "residential",
            PropertyType::Commercial => "commercial",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Residential => "Residential",
            PropertyType::Commercial => "Commercial",
        }
    }
}

impl FromStr for PropertyType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "residential" => Ok(PropertyType::Residential),
            "commercial" => Ok(PropertyType::Commercial),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WiringType {
    Existing,
    New,
}

impl WiringType {
    /// Label shown in the confirmation email; an absent choice reads "Not specified"
    pub fn label(wiring: Option<WiringType>) -> &'static str {
        match wiring {
            Some(WiringType::Existing) => "Existing Wiring",
            Some(WiringType::New) => "New Wiring",
            None => "Not specified",
        }
    }
}

impl FromStr for WiringType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "existing" => Ok(WiringType::Existing),
            "new" => Ok(WiringType::New),
            _ => Err(()),
        }
    }
}

fn validate_phone_digits(phone: &str) -> Result<(), ValidationError> {
    if phone_digit_count(phone) < MIN_PHONE_DIGITS {
        return Err(ValidationError::new("phone_digits")
            .with_message(Cow::Borrowed("Phone must contain at least 10 digits")));
    }
    Ok(())
}

fn validate_service_type(value: &str) -> Result<(), ValidationError> {
    ServiceType::from_str(value).map(|_| ()).map_err(|_| {
        ValidationError::new("enum").with_message(Cow::Borrowed("Please select a valid service"))
    })
}

fn validate_property_type(value: &str) -> Result<(), ValidationError> {
    PropertyType::from_str(value).map(|_| ()).map_err(|_| {
        ValidationError::new("enum")
            .with_message(Cow::Borrowed("Property type must be residential or commercial"))
    })
}

fn validate_wiring_type(value: &str) -> Result<(), ValidationError> {
    WiringType::from_str(value).map(|_| ()).map_err(|_| {
        ValidationError::new("enum")
            .with_message(Cow::Borrowed("Wiring type must be existing or new"))
    })
}

/// Contact form payload as posted by the browser.
///
/// Every field is optional at the JSON level so that a missing field is
/// reported as a field error rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormDto {
    #[validate(
        required(message = "Name is required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        regex(
            path = *PERSON_NAME_REGEX,
            message = "Name can only contain letters, spaces, hyphens, and apostrophes"
        )
    )]
    #[schema(example = "Jo Smith")]
    pub name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        email(message = "Please enter a valid email address"),
        length(max = 255, message = "Email must be less than 255 characters")
    )]
    #[schema(example = "jo@example.com")]
    pub email: Option<String>,

    #[validate(
        required(message = "Phone is required"),
        length(min = 10, max = 20, message = "Phone must be between 10 and 20 characters"),
        regex(
            path = *PHONE_REGEX,
            message = "Phone can only contain numbers, spaces, parentheses, hyphens, dots, and plus signs"
        ),
        custom(function = validate_phone_digits)
    )]
    #[schema(example = "631-555-1212")]
    pub phone: Option<String>,

    #[validate(
        required(message = "Address is required"),
        length(min = 5, max = 500, message = "Address must be between 5 and 500 characters")
    )]
    #[schema(example = "12 Main St, Huntington NY")]
    pub address: Option<String>,

    #[validate(
        required(message = "Service type is required"),
        custom(function = validate_service_type)
    )]
    #[schema(example = "pool-sauna-electrical")]
    pub service_type: Option<String>,

    #[validate(
        required(message = "Property type is required"),
        custom(function = validate_property_type)
    )]
    #[schema(example = "residential")]
    pub property_type: Option<String>,

    #[validate(custom(function = validate_wiring_type))]
    pub wiring_type: Option<String>,

    #[validate(length(max = 2000, message = "Description must be less than 2000 characters"))]
    pub description: Option<String>,
}

/// Wire names of the form fields, in the order the form presents them
pub const CONTACT_FORM_FIELDS: [&str; 8] = [
    "name",
    "email",
    "phone",
    "address",
    "serviceType",
    "propertyType",
    "wiringType",
    "description",
];

/// Map a struct field name to its camelCase wire name
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten validator output into `field: message` errors ordered by form position
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut collected: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            let wire = wire_name(field);
            field_errors.iter().map(move |error| FieldError {
                field: wire.clone(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", error.code)),
            })
        })
        .collect();

    let position = |field: &str| {
        CONTACT_FORM_FIELDS
            .iter()
            .position(|f| *f == field)
            .unwrap_or(CONTACT_FORM_FIELDS.len())
    };
    // Stable sort keeps the validator's per-field rule order
    collected.sort_by_key(|error| position(&error.field));
    collected
}

/// Successful submission summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmittedDto {
    pub email_sent: bool,
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ContactFormDto {
        ContactFormDto {
            name: Some("Jo Smith".to_string()),
            email: Some("jo@example.com".to_string()),
            phone: Some("631-555-1212".to_string()),
            address: Some("12 Main St, Huntington NY".to_string()),
            service_type: Some("pool-sauna-electrical".to_string()),
            property_type: Some("residential".to_string()),
            wiring_type: None,
            description: None,
        }
    }

    fn fields_of(dto: &ContactFormDto) -> Vec<String> {
        let errors = dto.validate().unwrap_err();
        collect_field_errors(&errors)
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let dto = ContactFormDto {
            phone: None,
            ..valid_form()
        };
        assert_eq!(fields_of(&dto), vec!["phone"]);
    }

    #[test]
    fn test_errors_follow_form_order_with_wire_names() {
        let dto = ContactFormDto {
            name: Some("J".to_string()),
            property_type: Some("industrial".to_string()),
            service_type: Some("plumbing".to_string()),
            description: Some("x".repeat(2001)),
            ..valid_form()
        };
        assert_eq!(
            fields_of(&dto),
            vec!["name", "serviceType", "propertyType", "description"]
        );
    }

    #[test]
    fn test_phone_needs_ten_digits() {
        let dto = ContactFormDto {
            phone: Some("(631) 555-12 .".to_string()),
            ..valid_form()
        };
        let errors = collect_field_errors(&dto.validate().unwrap_err());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "phone: Phone must contain at least 10 digits");
    }

    #[test]
    fn test_wiring_type_is_optional_but_checked() {
        let mut dto = valid_form();
        dto.wiring_type = Some("new".to_string());
        assert!(dto.validate().is_ok());

        dto.wiring_type = Some("copper".to_string());
        assert_eq!(fields_of(&dto), vec!["wiringType"]);
    }

    #[test]
    fn test_service_type_wire_values_round_trip() {
        for service in ServiceType::ALL {
            assert_eq!(ServiceType::from_str(service.as_str()), Ok(service));
        }
        assert_eq!(
            ServiceType::from_str("ev-Charger-Installation").map(|s| s.label()),
            Ok("EV Charger Installation")
        );
        assert!(ServiceType::from_str("ev-charger-installation").is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(PropertyType::Commercial.label(), "Commercial");
        assert_eq!(WiringType::label(Some(WiringType::Existing)), "Existing Wiring");
        assert_eq!(WiringType::label(None), "Not specified");
    }

    #[test]
    fn test_wire_name() {
        assert_eq!(wire_name("service_type"), "serviceType");
        assert_eq!(wire_name("serviceType"), "serviceType");
        assert_eq!(wire_name("name"), "name");
    }
}

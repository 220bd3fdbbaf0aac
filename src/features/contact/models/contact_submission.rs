use std::str::FromStr;

use serde::Serialize;

use crate::core::error::AppError;
use crate::features::contact::dtos::{ContactFormDto, PropertyType, ServiceType, WiringType};
use crate::shared::validation::sanitize_input;

/// A validated, sanitized contact request. Lives only for the duration of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub service_type: ServiceType,
    pub property_type: PropertyType,
    pub wiring_type: Option<WiringType>,
    pub description: Option<String>,
}

impl ContactSubmission {
    /// Build from a form that already passed validation, sanitizing free text
    pub fn from_validated(dto: ContactFormDto) -> Result<Self, AppError> {
        let required = |value: Option<String>, field: &str| {
            value.ok_or_else(|| AppError::Internal(format!("validated form is missing {}", field)))
        };
        let parse_enum = |value: &str, field: &str| {
            AppError::Internal(format!("validated form has invalid {}: {}", field, value))
        };

        let service_type = required(dto.service_type, "serviceType")?;
        let property_type = required(dto.property_type, "propertyType")?;

        Ok(Self {
            name: sanitize_input(&required(dto.name, "name")?),
            email: sanitize_input(&required(dto.email, "email")?).to_lowercase(),
            phone: sanitize_input(&required(dto.phone, "phone")?),
            address: sanitize_input(&required(dto.address, "address")?),
            service_type: ServiceType::from_str(&service_type)
                .map_err(|_| parse_enum(&service_type, "serviceType"))?,
            property_type: PropertyType::from_str(&property_type)
                .map_err(|_| parse_enum(&property_type, "propertyType"))?,
            wiring_type: dto
                .wiring_type
                .as_deref()
                .map(|w| WiringType::from_str(w).map_err(|_| parse_enum(w, "wiringType")))
                .transpose()?,
            description: dto
                .description
                .as_deref()
                .map(sanitize_input)
                .filter(|d| !d.is_empty()),
        })
    }

    /// Values exposed to the confirmation email templates
    pub fn email_context(&self) -> ContactEmailContext<'_> {
        ContactEmailContext {
            name: &self.name,
            phone: &self.phone,
            address: &self.address,
            service: self.service_type.label(),
            property_type: self.property_type.label(),
            wiring_type: WiringType::label(self.wiring_type),
            description: self.description.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactEmailContext<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub service: &'static str,
    pub property_type: &'static str,
    pub wiring_type: &'static str,
    pub description: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_validated_sanitizes_and_lowercases() {
        let submission = ContactSubmission::from_validated(ContactFormDto {
            name: Some("  Jo Smith ".to_string()),
            email: Some("Jo@Example.COM".to_string()),
            phone: Some("631-555-1212".to_string()),
            address: Some("<b>12 Main St</b> onclick=alert(1)".to_string()),
            service_type: Some("ev-Charger-Installation".to_string()),
            property_type: Some("commercial".to_string()),
            wiring_type: Some("existing".to_string()),
            description: Some("javascript:void(0) please call".to_string()),
        })
        .unwrap();

        assert_eq!(submission.name, "Jo Smith");
        assert_eq!(submission.email, "jo@example.com");
        assert_eq!(submission.address, "b12 Main St/b alert(1)");
        assert_eq!(submission.service_type, ServiceType::EvChargerInstallation);
        assert_eq!(submission.wiring_type, Some(WiringType::Existing));
        assert_eq!(submission.description.as_deref(), Some("void(0) please call"));
    }

    #[test]
    fn test_email_context_uses_labels() {
        let submission = ContactSubmission {
            name: "Jo Smith".to_string(),
            email: "jo@example.com".to_string(),
            phone: "631-555-1212".to_string(),
            address: "12 Main St".to_string(),
            service_type: ServiceType::PoolSaunaElectrical,
            property_type: PropertyType::Residential,
            wiring_type: None,
            description: None,
        };

        let ctx = submission.email_context();
        assert_eq!(ctx.service, "Pool & Sauna Electrical");
        assert_eq!(ctx.property_type, "Residential");
        assert_eq!(ctx.wiring_type, "Not specified");
    }
}

//! # Contact and Web Info (legacy XML API)

use crate::codec::json::require;
use crate::codec::XmlElement;
use bluesnap_core::BlueSnapResult;

/// Placeholder the gateway accepts for contact fields we do not know
pub const NONE_PLACEHOLDER: &str = "(Empty)";

pub const DEFAULT_COUNTRY: &str = "GB";

/// Which contact section a `ContactInfo` is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Contact,
    Billing,
    Shopper,
}

impl ContactKind {
    pub fn element_name(&self) -> &'static str {
        match self {
            ContactKind::Contact => "contact-info",
            ContactKind::Billing => "billing-contact-info",
            ContactKind::Shopper => "shopper-contact-info",
        }
    }
}

/// Shopper contact details. Only the email is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    address_1: Option<String>,
    city: Option<String>,
    zip: Option<String>,
    country: Option<String>,
    phone: Option<String>,
}

impl ContactInfo {
    pub fn new(email: impl Into<String>) -> BlueSnapResult<Self> {
        let email = email.into();
        require("email", &email)?;

        Ok(Self {
            email,
            first_name: None,
            last_name: None,
            address_1: None,
            city: None,
            zip: None,
            country: None,
            phone: None,
        })
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_address(
        mut self,
        address_1: impl Into<String>,
        city: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        self.address_1 = Some(address_1.into());
        self.city = Some(city.into());
        self.zip = Some(zip.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn to_xml(&self, kind: ContactKind) -> XmlElement {
        XmlElement::new(kind.element_name())
            .child(XmlElement::leaf("first-name", or_placeholder(&self.first_name)))
            .child(XmlElement::leaf("last-name", or_placeholder(&self.last_name)))
            .child(XmlElement::leaf("email", &self.email))
            .child(XmlElement::leaf("address1", or_placeholder(&self.address_1)))
            .child(XmlElement::leaf("city", or_placeholder(&self.city)))
            .child(XmlElement::leaf("zip", or_placeholder(&self.zip)))
            .child(XmlElement::leaf("country", or_default(&self.country, DEFAULT_COUNTRY)))
            .child(XmlElement::leaf("phone", or_placeholder(&self.phone)))
    }
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn or_placeholder(value: &Option<String>) -> &str {
    or_default(value, NONE_PLACEHOLDER)
}

/// Shopper session details sent with shoppers and orders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebInfo {
    pub ip: String,
    pub remote_host: String,
    pub user_agent: String,
}

impl WebInfo {
    /// Web info for a shopper IP, defaulting host and user agent
    pub fn for_ip(ip: Option<&str>) -> Self {
        let mut info = Self::default();
        if let Some(ip) = ip.filter(|ip| !ip.trim().is_empty()) {
            info.ip = ip.to_string();
        }
        info
    }

    pub fn to_xml(&self) -> XmlElement {
        XmlElement::new("web-info")
            .child(XmlElement::leaf("ip", &self.ip))
            .child(XmlElement::leaf("remote-host", &self.remote_host))
            .child(XmlElement::leaf("user-agent", &self.user_agent))
    }
}

impl Default for WebInfo {
    fn default() -> Self {
        Self {
            ip: "0.0.0.0".to_string(),
            remote_host: "localhost".to_string(),
            user_agent: crate::user_agent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_required() {
        assert!(ContactInfo::new("").is_err());
        assert!(ContactInfo::new("dev@example.com").is_ok());
    }

    #[test]
    fn test_element_names() {
        let contact = ContactInfo::new("dev@example.com").unwrap();
        assert_eq!(contact.to_xml(ContactKind::Contact).name(), "contact-info");
        assert_eq!(contact.to_xml(ContactKind::Billing).name(), "billing-contact-info");
        assert_eq!(contact.to_xml(ContactKind::Shopper).name(), "shopper-contact-info");
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let xml = ContactInfo::new("dev@example.com")
            .unwrap()
            .with_name("John", "Doe")
            .to_xml(ContactKind::Contact);

        let names: Vec<&str> = xml.child_elements().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            ["first-name", "last-name", "email", "address1", "city", "zip", "country", "phone"]
        );
        assert_eq!(xml.find_text("first-name"), Some("John"));
        assert_eq!(xml.find_text("email"), Some("dev@example.com"));
        assert_eq!(xml.find_text("address1"), Some(NONE_PLACEHOLDER));
        assert_eq!(xml.find_text("phone"), Some(NONE_PLACEHOLDER));
        assert_eq!(xml.find_text("country"), Some("GB"));
    }

    #[test]
    fn test_web_info_defaults() {
        let xml = WebInfo::for_ip(None).to_xml();
        assert_eq!(xml.name(), "web-info");
        assert_eq!(xml.find_text("ip"), Some("0.0.0.0"));
        assert_eq!(xml.find_text("remote-host"), Some("localhost"));
        assert!(xml.find_text("user-agent").unwrap().starts_with("bluesnap-rs/"));

        let xml = WebInfo::for_ip(Some("10.0.0.7")).to_xml();
        assert_eq!(xml.find_text("ip"), Some("10.0.0.7"));
    }
}

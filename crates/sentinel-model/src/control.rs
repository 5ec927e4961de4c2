//! ISO 27001 control catalogue

use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Catalogue code such as `A.9.2`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(String);

impl ControlId {
    /// Borrow the code
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ControlId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ControlId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let well_formed = code
            .strip_prefix("A.")
            .is_some_and(|rest| {
                !rest.is_empty()
                    && rest
                        .split('.')
                        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
            });
        if well_formed {
            Ok(Self(code.to_string()))
        } else {
            Err(ValidationError::unparseable("control id", s))
        }
    }
}

/// One catalogue requirement; only `implemented` ever changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: ControlId,
    pub category: String,
    pub title: String,
    pub description: String,
    pub implemented: bool,
}

/// Filter for control listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlFilter {
    #[default]
    All,
    Implemented,
    Pending,
}

impl ControlFilter {
    /// Whether a control passes the filter
    #[inline]
    #[must_use]
    pub fn accepts(self, control: &Control) -> bool {
        match self {
            Self::All => true,
            Self::Implemented => control.implemented,
            Self::Pending => !control.implemented,
        }
    }
}

impl FromStr for ControlFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "implemented" => Ok(Self::Implemented),
            "pending" => Ok(Self::Pending),
            _ => Err(ValidationError::unparseable("control filter", s)),
        }
    }
}

const CATALOG: [(&str, &str, &str, &str, bool); 20] = [
    ("A.5.1", "Organizational Controls", "Policies for Information Security",
     "Information security policy and topic-specific policies shall be defined, approved by management, published, communicated to and acknowledged by relevant personnel and relevant interested parties, and reviewed at planned intervals.", false),
    ("A.5.2", "Organizational Controls", "Information Security Roles and Responsibilities",
     "Information security roles and responsibilities shall be defined and allocated according to the organization needs.", false),
    ("A.5.3", "Organizational Controls", "Segregation of Duties",
     "Conflicting duties and conflicting areas of responsibility shall be segregated.", false),
    ("A.8.1", "Asset Management", "Inventory of Assets",
     "Assets associated with information and information processing facilities shall be identified and an inventory of these assets shall be drawn up and maintained.", true),
    ("A.8.2", "Asset Management", "Ownership of Assets",
     "Assets maintained in the inventory shall be owned.", true),
    ("A.8.3", "Asset Management", "Acceptable Use of Assets",
     "Rules for the acceptable use of information and of assets associated with information and information processing facilities shall be identified, documented and implemented.", false),
    ("A.9.1", "Access Control", "Access Control Policy",
     "An access control policy shall be established, documented and reviewed based on business and information security requirements.", true),
    ("A.9.2", "Access Control", "User Access Management",
     "A user access management process shall be implemented to assign or revoke access rights for all user types to all systems and services.", true),
    ("A.9.3", "Access Control", "User Responsibilities",
     "Users shall be required to follow the organization's practices in the use of authentication information.", false),
    ("A.9.4", "Access Control", "System and Application Access Control",
     "Access to systems and applications shall be controlled in accordance with the access control policy.", true),
    ("A.12.1", "Operations Security", "Operational Procedures and Responsibilities",
     "Operational procedures shall be documented and made available to personnel who need them.", false),
    ("A.12.2", "Operations Security", "Protection from Malware",
     "Protection against malware shall be implemented and supported by appropriate user awareness.", true),
    ("A.12.3", "Operations Security", "Backup",
     "Backup copies of information, software and systems shall be maintained and regularly tested in accordance with the agreed backup policy.", true),
    ("A.12.4", "Operations Security", "Logging and Monitoring",
     "Event logs recording user activities, exceptions, faults and information security events shall be produced, kept and regularly reviewed.", false),
    ("A.14.1", "System Acquisition & Development", "Security Requirements of Information Systems",
     "Information security requirements shall be included in the requirements for new information systems or enhancements to existing information systems.", false),
    ("A.14.2", "System Acquisition & Development", "Security in Development and Support Processes",
     "Rules for the secure development of software and systems shall be established and applied.", true),
    ("A.17.1", "Business Continuity", "Planning Information Security Continuity",
     "Requirements for information security and the continuity of information security management shall be determined and planned.", false),
    ("A.17.2", "Business Continuity", "Redundancies",
     "Information processing facilities shall be implemented with redundancy sufficient to meet availability requirements.", true),
    ("A.18.1", "Compliance", "Compliance with Legal Requirements",
     "All relevant legislative statutory, regulatory, contractual requirements and the organization's approach to meet these requirements shall be explicitly identified, documented and kept up to date.", false),
    ("A.18.2", "Compliance", "Information Security Reviews",
     "The organization's approach to managing information security and its implementation shall be reviewed independently at planned intervals.", false),
];

/// The ISO 27001 catalogue with its default implementation flags
#[must_use]
pub fn iso27001_catalog() -> Vec<Control> {
    CATALOG
        .iter()
        .map(|&(id, category, title, description, implemented)| Control {
            id: ControlId(id.to_string()),
            category: category.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            implemented,
        })
        .collect()
}

/// `round(100 * implemented / total)`; 0 for an empty list
#[must_use]
pub fn completion_percentage(implemented: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let implemented = implemented.min(total);
    u8::try_from((200 * implemented + total) / (2 * total)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_shape() {
        let catalog = iso27001_catalog();
        assert_eq!(catalog.len(), 20);
        let ids: HashSet<_> = catalog.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), 20, "ids are unique");
        assert_eq!(catalog.iter().filter(|c| c.implemented).count(), 9);
    }

    #[test]
    fn catalog_ids_parse() {
        for control in iso27001_catalog() {
            let parsed: ControlId = control.id.as_str().parse().unwrap();
            assert_eq!(parsed, control.id);
        }
    }

    #[test]
    fn control_id_rejects_garbage() {
        assert!("B.1".parse::<ControlId>().is_err());
        assert!("A.".parse::<ControlId>().is_err());
        assert!("A.9.x".parse::<ControlId>().is_err());
        assert!("A.9..2".parse::<ControlId>().is_err());
    }

    #[test]
    fn completion_rounding() {
        assert_eq!(completion_percentage(9, 20), 45);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(0, 0), 0);
        assert_eq!(completion_percentage(20, 20), 100);
    }

    #[test]
    fn filter_accepts() {
        let mut control = iso27001_catalog().remove(0);
        assert!(ControlFilter::Pending.accepts(&control));
        control.implemented = true;
        assert!(ControlFilter::Implemented.accepts(&control));
        assert!(ControlFilter::All.accepts(&control));
    }
}

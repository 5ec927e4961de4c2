//! Scan checks, their findings and remediation guides

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// One of the three scripted checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    S3Access,
    IamPolicy,
    DbEncryption,
}

impl Check {
    pub const ALL: [Check; 3] = [Self::S3Access, Self::IamPolicy, Self::DbEncryption];

    /// Guide heading
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::S3Access => "Securing S3 Buckets",
            Self::IamPolicy => "Implementing Least Privilege IAM",
            Self::DbEncryption => "Enabling RDS Encryption",
        }
    }

    /// Fix for the misconfiguration this check detects
    #[must_use]
    pub const fn remediation(self) -> &'static str {
        match self {
            Self::S3Access => S3_REMEDIATION,
            Self::IamPolicy => IAM_REMEDIATION,
            Self::DbEncryption => RDS_REMEDIATION,
        }
    }
}

const S3_REMEDIATION: &str = r#"# Block all public access
aws s3api put-public-access-block \
  --bucket sensitive-customer-data \
  --public-access-block-configuration \
  "BlockPublicAcls=true,IgnorePublicAcls=true,\
   BlockPublicPolicy=true,RestrictPublicBuckets=true"

# Enable versioning
aws s3api put-bucket-versioning \
  --bucket sensitive-customer-data \
  --versioning-configuration Status=Enabled"#;

const IAM_REMEDIATION: &str = r#"# Python: Create restricted policy
import boto3

iam = boto3.client('iam')
policy = {
    "Version": "2012-10-17",
    "Statement": [{
        "Effect": "Allow",
        "Action": ["s3:GetObject", "s3:ListBucket"],
        "Resource": "arn:aws:s3:::my-bucket/*"
    }]
}
iam.create_policy(PolicyName='RestrictedS3Access',
                  PolicyDocument=json.dumps(policy))"#;

const RDS_REMEDIATION: &str = r#"# Terraform: Enable RDS encryption
resource "aws_db_instance" "production" {
  identifier = "prod-mysql-cluster"
  engine     = "mysql"

  storage_encrypted = true
  kms_key_id       = aws_kms_key.rds.arn

  # Note: Cannot enable encryption on existing unencrypted DB
  # Must create snapshot → copy with encryption → restore
}"#;

/// Finding severity; critical findings count as issues, high as warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    High,
    Critical,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        })
    }
}

/// A detected misconfiguration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub check: Check,
    pub severity: Severity,
    pub headline: &'static str,
    /// Label of the affected resource, e.g. `Bucket`
    pub resource_kind: &'static str,
    pub resource: &'static str,
    pub issue: &'static str,
    pub recommendation: &'static str,
}

impl Finding {
    pub(crate) const PUBLIC_BUCKET: Finding = Finding {
        check: Check::S3Access,
        severity: Severity::Critical,
        headline: "[ALERT] GUARDDUTY: Unprotected S3 Bucket Detected!",
        resource_kind: "Bucket",
        resource: "sensitive-customer-data",
        issue: "Public Read Access Enabled",
        recommendation: "Enable bucket versioning and private ACL",
    };

    pub(crate) const ADMIN_POLICY: Finding = Finding {
        check: Check::IamPolicy,
        severity: Severity::High,
        headline: "[WARNING] IAM: Overly Permissive Policies Detected",
        resource_kind: "User",
        resource: "dev-team@company.com",
        issue: "AdministratorAccess attached",
        recommendation: "Apply least privilege principle",
    };

    pub(crate) const UNENCRYPTED_DB: Finding = Finding {
        check: Check::DbEncryption,
        severity: Severity::Critical,
        headline: "[ALERT] RDS: Encryption at Rest DISABLED",
        resource_kind: "Database",
        resource: "prod-mysql-cluster",
        issue: "No encryption configured",
        recommendation: "Enable KMS encryption",
    };

    /// The five transcript lines describing this finding
    #[must_use]
    pub fn transcript(&self) -> [String; 5] {
        [
            self.headline.to_string(),
            format!("  ├─ {}: {}", self.resource_kind, self.resource),
            format!("  ├─ Issue: {}", self.issue),
            format!("  ├─ Risk Level: {}", self.severity),
            format!("  └─ Recommendation: {}", self.recommendation),
        ]
    }
}

//! Sample values consumed by the wizard steps

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Valid and invalid inputs for every wizard screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    pub email_valid: String,
    pub email_invalids: Vec<String>,
    pub code_valid: String,
    pub code_invalids: Vec<String>,
    pub workspace_name_valid: String,
    pub workspace_name_invalids: Vec<String>,
    pub first_name: String,
    pub last_name: String,
    pub birth_day: String,
    pub birth_month: String,
    pub birth_year: String,
    pub invite_emails: Vec<String>,
}

impl Default for UserData {
    fn default() -> Self {
        Self {
            email_valid: "user@test.com".into(),
            email_invalids: strings(&[
                "",
                "usertest.com",
                "@",
                "verylongemailaddress_exceeding_limits_but_for_test@example.com",
                "user!@test.com",
            ]),
            code_valid: "666555".into(),
            code_invalids: strings(&["", "123", "abc123"]),
            workspace_name_valid: "qa-lenzaos-ws".into(),
            workspace_name_invalids: strings(&["", "***", "   "]),
            first_name: "Ivan".into(),
            last_name: "Petrov".into(),
            birth_day: "10".into(),
            birth_month: "March".into(),
            birth_year: "1995".into(),
            invite_emails: strings(&["mate1@test.com", "bad@@mail", "friend2@test.com"]),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[derive(Deserialize)]
struct FixtureFile {
    #[serde(default)]
    fixtures: UserData,
}

impl UserData {
    /// Load the `[fixtures]` table of a TOML file, defaulting unset fields
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: FixtureFile = toml::from_str(&content)?;
        Ok(file.fixtures)
    }

    /// Full name as the dashboard renders it
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

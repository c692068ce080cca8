use std::env;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SERVICES: &str = "Orthopaedic,Gynaecology,General physician";

/// Public facing description of the clinic.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicProfile {
    pub name: String,
    pub short_name: String,
    pub address: String,
    pub owner: String,
    pub services: Vec<String>,
}

impl ClinicProfile {
    pub fn greeting(&self) -> String {
        format!("Welcome to {}", self.name)
    }
}

impl Default for ClinicProfile {
    fn default() -> Self {
        Self {
            name: "Harsha Multi Speciality Hospital".to_string(),
            short_name: "Harsha Hospital".to_string(),
            address: "Doctors Lane, Nirmal, Telangana".to_string(),
            owner: "Dr. Prashanth Kokkula".to_string(),
            services: parse_services(DEFAULT_SERVICES),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_token: String,
    pub bind_addr: String,
    pub seed_demo_roster: bool,
    pub clinic: ClinicProfile,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = ClinicProfile::default();

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using in-memory slot store");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_service_token: env::var("SUPABASE_SERVICE_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_TOKEN not set, requests use the anon key only");
                    String::new()
                }),
            bind_addr: env_or("CLINIC_BIND_ADDR", DEFAULT_BIND_ADDR.to_string()),
            seed_demo_roster: env::var("CLINIC_SEED_DEMO")
                .map(|value| parse_flag(&value))
                .unwrap_or_else(|_| {
                    warn!("CLINIC_SEED_DEMO not set, demo roster disabled");
                    false
                }),
            clinic: ClinicProfile {
                name: env_or("CLINIC_NAME", defaults.name),
                short_name: env_or("CLINIC_SHORT_NAME", defaults.short_name),
                address: env_or("CLINIC_ADDRESS", defaults.address),
                owner: env_or("CLINIC_OWNER", defaults.owner),
                services: env::var("CLINIC_SERVICES")
                    .map(|raw| parse_services(&raw))
                    .unwrap_or_else(|_| {
                        warn!("CLINIC_SERVICES not set, using default services");
                        defaults.services
                    }),
            },
        };

        if !config.is_configured() {
            warn!("Remote store not configured - slot state will not survive a restart");
        }

        config
    }

    /// True when the PostgREST backed store can be used.
    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            supabase_service_token: String::new(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            seed_demo_roster: false,
            clinic: ClinicProfile::default(),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using {}", key, default);
        default
    })
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_services(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|service| !service.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_services_are_split_and_trimmed() {
        let services = parse_services(" Orthopaedic , ,Dentistry");
        assert_eq!(services, vec!["Orthopaedic".to_string(), "Dentistry".to_string()]);
    }

    #[test]
    fn test_unset_variable_falls_back_to_default() {
        let value = env_or("CLINIC_CONFIG_TEST_NEVER_SET", "Harsha Hospital".to_string());
        assert_eq!(value, "Harsha Hospital");
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_default_config_uses_memory_store() {
        let config = AppConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.clinic.services.len(), 3);
        assert_eq!(
            config.clinic.greeting(),
            "Welcome to Harsha Multi Speciality Hospital"
        );
    }
}

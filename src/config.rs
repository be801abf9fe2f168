use serde::Deserialize;

/// Whether a contract enforces, observes, or is switched off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Validate and reject failures with 400.
    #[default]
    Debug,
    /// Validate and log failures, but never reject.
    Observe,
    /// Skip validation entirely; the handler is called directly.
    Production,
}

impl Mode {
    /// Maps the host's debug switch: `true` enforces, `false` bypasses.
    ///
    /// # Examples
    ///
    /// ```
    /// use api_contract::Mode;
    ///
    /// assert_eq!(Mode::from_debug_flag(true), Mode::Debug);
    /// assert_eq!(Mode::from_debug_flag(false), Mode::Production);
    /// ```
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug {
            Mode::Debug
        } else {
            Mode::Production
        }
    }

    /// Returns true if the contract should not run at all.
    pub fn is_bypassed(self) -> bool {
        self == Mode::Production
    }

    /// Returns true if failures turn into 400 responses.
    pub fn rejects(self) -> bool {
        self == Mode::Debug
    }
}

/// Settings shared by every stage of a contract.
///
/// The config is passed to the contract when it is built; nothing is read
/// from process-wide state at request time. It deserializes from the host's
/// own settings, with every field optional.
///
/// # Examples
///
/// ```
/// use api_contract::{ContractConfig, Mode};
///
/// let config = ContractConfig::default().expose_errors(true);
/// assert_eq!(config.mode(), Mode::Debug);
/// assert!(config.exposes_errors());
///
/// let config: ContractConfig = serde_json::from_str(r#"{"mode": "production"}"#).unwrap();
/// assert!(config.mode().is_bypassed());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    mode: Mode,
    expose_errors: bool,
    allow_server_errors: bool,
    require_json: bool,
}

impl ContractConfig {
    /// Enforcing config with every optional check off.
    pub fn debug() -> Self {
        Self::default()
    }

    /// Bypassing config.
    pub fn production() -> Self {
        Self::default().with_mode(Mode::Production)
    }

    /// Sets the mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Puts the failure description (and field errors) in the 400 body
    /// instead of the generic message.
    pub fn expose_errors(mut self, expose: bool) -> Self {
        self.expose_errors = expose;
        self
    }

    /// Lets 500 responses through the returns check even when undeclared.
    pub fn allow_server_errors(mut self, allow: bool) -> Self {
        self.allow_server_errors = allow;
        self
    }

    /// Rejects handler responses that are not `application/json`.
    pub fn require_json(mut self, require: bool) -> Self {
        self.require_json = require;
        self
    }

    /// Returns the configured mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns true if failure details go in the 400 body.
    pub fn exposes_errors(&self) -> bool {
        self.expose_errors
    }

    /// Returns true if undeclared 500s pass the returns check.
    pub fn allows_server_errors(&self) -> bool {
        self.allow_server_errors
    }

    /// Returns true if handler responses must be JSON.
    pub fn requires_json(&self) -> bool {
        self.require_json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_enforcing_with_checks_off() {
        let config = ContractConfig::default();

        assert_eq!(config.mode(), Mode::Debug);
        assert!(!config.exposes_errors());
        assert!(!config.allows_server_errors());
        assert!(!config.requires_json());
    }

    #[test]
    fn mode_predicates() {
        assert!(Mode::Debug.rejects());
        assert!(!Mode::Debug.is_bypassed());
        assert!(!Mode::Observe.rejects());
        assert!(!Mode::Observe.is_bypassed());
        assert!(Mode::Production.is_bypassed());
    }

    #[test]
    fn builder_sets_options() {
        let config = ContractConfig::debug()
            .with_mode(Mode::Observe)
            .allow_server_errors(true)
            .require_json(true);

        assert_eq!(config.mode(), Mode::Observe);
        assert!(config.allows_server_errors());
        assert!(config.requires_json());
        assert_eq!(ContractConfig::production().mode(), Mode::Production);
    }

    #[test]
    fn deserializes_partial_settings() {
        let config: ContractConfig =
            serde_json::from_str(r#"{"mode": "observe", "require_json": true}"#).unwrap();

        assert_eq!(config.mode(), Mode::Observe);
        assert!(config.requires_json());
        assert!(!config.exposes_errors());
    }

    #[test]
    fn rejects_unknown_mode() {
        let result: Result<ContractConfig, _> = serde_json::from_str(r#"{"mode": "staging"}"#);
        assert!(result.is_err());
    }
}

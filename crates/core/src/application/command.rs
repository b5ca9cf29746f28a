// Tool Command Builder
// Builds argv vectors for the registry tool; values are never re-split on whitespace

use std::fmt;

use crate::domain::ConnectionString;

pub const LOGIN_FLAG: &str = "--login";
const REDACTED: &str = "***";

/// One invocation of the registry tool
///
/// Flags keep insertion order; `--login` always goes last.
///
/// # Example
/// ```
/// use iothub_core::application::command::AzCommand;
///
/// let args = AzCommand::device_twin("show")
///     .arg("--device-id", "sensor-01")
///     .opt_arg("--top", None::<String>)
///     .into_args();
/// assert_eq!(args, ["iot", "hub", "device-twin", "show", "--device-id", "sensor-01"]);
/// ```
#[derive(Clone)]
pub struct AzCommand {
    args: Vec<String>,
    login: Option<String>,
}

impl AzCommand {
    pub fn new(path: &[&str]) -> Self {
        Self {
            args: path.iter().map(|s| s.to_string()).collect(),
            login: None,
        }
    }

    /// `iot hub device-twin <action>`
    pub fn device_twin(action: &str) -> Self {
        Self::new(&["iot", "hub", "device-twin", action])
    }

    /// `iot hub device-identity <action>`
    pub fn device_identity(action: &str) -> Self {
        Self::new(&["iot", "hub", "device-identity", action])
    }

    pub fn arg(mut self, flag: &str, value: impl Into<String>) -> Self {
        self.args.push(flag.to_string());
        self.args.push(value.into());
        self
    }

    pub fn opt_arg<V: Into<String>>(self, flag: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.arg(flag, v),
            None => self,
        }
    }

    pub fn login(mut self, connection_string: &ConnectionString) -> Self {
        self.login = Some(connection_string.expose().to_string());
        self
    }

    pub fn into_args(self) -> Vec<String> {
        let mut args = self.args;
        if let Some(login) = self.login {
            args.push(LOGIN_FLAG.to_string());
            args.push(login);
        }
        args
    }

    /// Loggable rendering with the connection string masked
    pub fn redacted(&self) -> String {
        let mut rendered = self.args.join(" ");
        if self.login.is_some() {
            rendered.push_str(&format!(" {} {}", LOGIN_FLAG, REDACTED));
        }
        rendered
    }
}

impl fmt::Display for AzCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for AzCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AzCommand").field(&self.redacted()).finish()
    }
}

/// Render a raw argv for logs, masking the value after `--login`
pub fn redact_args(args: &[String]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(args.len());
    let mut hide_next = false;

    for arg in args {
        if hide_next {
            out.push(REDACTED);
            hide_next = false;
        } else if arg == LOGIN_FLAG {
            out.push(LOGIN_FLAG);
            hide_next = true;
        } else if arg.starts_with("--login=") {
            out.push("--login=***");
        } else {
            out.push(arg);
        }
    }

    out.join(" ")
}

/// Etags travel quoted on the command line (`"AAAAAAAAAAM="`)
pub fn quote_etag(etag: &str) -> String {
    if etag.len() > 1 && etag.starts_with('"') && etag.ends_with('"') {
        etag.to_string()
    } else {
        format!("\"{}\"", etag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs() -> ConnectionString {
        ConnectionString::parse(
            "HostName=hub.azure-devices.net;SharedAccessKeyName=owner;SharedAccessKey=c2VjcmV0",
        )
        .unwrap()
    }

    #[test]
    fn test_login_goes_last() {
        let args = AzCommand::device_identity("create")
            .login(&cs())
            .arg("--device-id", "d1")
            .arg("--status", "enabled")
            .into_args();

        assert_eq!(&args[..4], ["iot", "hub", "device-identity", "create"]);
        assert_eq!(args[args.len() - 2], "--login");
        assert!(args[args.len() - 1].starts_with("HostName=hub.azure-devices.net"));
        assert_eq!(args[4..8], ["--device-id", "d1", "--status", "enabled"]);
    }

    #[test]
    fn test_values_with_spaces_stay_one_argument() {
        let args = AzCommand::device_identity("update")
            .arg("--status-reason", "decommissioned by ops")
            .into_args();

        assert_eq!(args.last().unwrap(), "decommissioned by ops");
    }

    #[test]
    fn test_redacted_hides_connection_string() {
        let cmd = AzCommand::device_twin("show").arg("--device-id", "d1").login(&cs());

        let rendered = cmd.redacted();
        assert_eq!(
            rendered,
            "iot hub device-twin show --device-id d1 --login ***"
        );
        assert!(!format!("{:?}", cmd).contains("c2VjcmV0"));
        assert!(!redact_args(&cmd.into_args()).contains("c2VjcmV0"));
    }

    #[test]
    fn test_redact_args_inline_form() {
        let args = vec!["version".to_string(), "--login=secret".to_string()];
        assert_eq!(redact_args(&args), "version --login=***");
    }

    #[test]
    fn test_quote_etag() {
        assert_eq!(quote_etag("AAAAAAAAAAM="), "\"AAAAAAAAAAM=\"");
        assert_eq!(quote_etag("\"AAAAAAAAAAM=\""), "\"AAAAAAAAAAM=\"");
        assert_eq!(quote_etag("\""), "\"\"\"");
        assert_eq!(quote_etag("*"), "\"*\"");
    }
}

// Connection URL Assembly

use suno_core::domain::Credentials;
use suno_core::port::DriverError;

/// Build the sqlx connection URL from configured credentials
///
/// - a leading `jdbc:` is dropped
/// - `sqlite:` addresses are used as-is (no authentication)
/// - otherwise principal and secret are percent-encoded into the authority,
///   unless the address already carries user info
pub fn connection_url(credentials: &Credentials) -> Result<String, DriverError> {
    let address = credentials.address().trim();
    let address = address.strip_prefix("jdbc:").unwrap_or(address);

    if address.starts_with("sqlite:") {
        return Ok(address.to_string());
    }

    let Some((scheme, rest)) = address.split_once("://") else {
        return Err(DriverError::new(format!(
            "Unsupported database address (expected scheme://...): {}",
            address
        )));
    };

    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    if rest[..authority_end].contains('@') {
        return Ok(address.to_string());
    }

    let user_info = if credentials.secret().is_empty() {
        urlencoding::encode(credentials.principal()).into_owned()
    } else {
        format!(
            "{}:{}",
            urlencoding::encode(credentials.principal()),
            urlencoding::encode(credentials.secret())
        )
    };

    Ok(format!("{}://{}@{}", scheme, user_info, rest))
}

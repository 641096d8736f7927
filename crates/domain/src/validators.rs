const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Validates a (possibly partially qualified) DNS name that will be spliced
/// into a shell script, so only characters with no shell meaning are allowed.
pub fn validate_dns_name(name: &str, entity: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("{entity} cannot be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!("{entity} '{name}' exceeds {MAX_NAME_LEN} characters"));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        return Err(format!("{entity} '{name}' contains invalid character '{bad}'"));
    }
    if name.starts_with('.') {
        return Err(format!("{entity} '{name}' cannot start with a dot"));
    }
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() || trimmed.split('.').any(str::is_empty) {
        return Err(format!("{entity} '{name}' contains an empty label"));
    }
    if trimmed.split('.').any(|label| label.len() > MAX_LABEL_LEN) {
        return Err(format!(
            "{entity} '{name}' has a label longer than {MAX_LABEL_LEN} characters"
        ));
    }
    Ok(())
}

/// Validates an RFC 1123 label (namespaces, hostnames, variant tags).
pub fn validate_label(value: &str, entity: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{entity} cannot be empty"));
    }
    if value.len() > MAX_LABEL_LEN {
        return Err(format!("{entity} '{value}' exceeds {MAX_LABEL_LEN} characters"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(format!(
            "{entity} '{value}' must consist of lowercase alphanumerics and '-'"
        ));
    }
    if value.starts_with('-') || value.ends_with('-') {
        return Err(format!(
            "{entity} '{value}' must start and end with an alphanumeric character"
        ));
    }
    Ok(())
}

/// Validates an RFC 1123 subdomain (pod names, cluster domains).
pub fn validate_subdomain(value: &str, entity: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{entity} cannot be empty"));
    }
    if value.len() > MAX_NAME_LEN {
        return Err(format!("{entity} '{value}' exceeds {MAX_NAME_LEN} characters"));
    }
    value
        .split('.')
        .try_for_each(|label| validate_label(label, entity))
}

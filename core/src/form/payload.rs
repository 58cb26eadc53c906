use serde::Serialize;

/// Text that precedes the fenced JSON block in a form submission message.
pub const SUBMISSION_PREFIX: &str = "Here are my details: ";

/// Values read from one live form block at the moment of submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub product_interest: String,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
}

impl SubmissionPayload {
    /// Encode the payload as a regular chat message the server can pick the
    /// structured data back out of.
    pub fn to_chat_message(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{SUBMISSION_PREFIX}```json{json}```"))
    }
}

/// Integer parse with the widget's recovery rule: take the leading signed
/// integer (surrounding whitespace and trailing junk are tolerated) and fall
/// back to 1 when there is none or it is zero. Magnitudes past the `i64`
/// range saturate.
pub fn parse_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return 1;
    }
    // Only overflow can fail here: the digits are all ASCII.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    match if negative { -magnitude } else { magnitude } {
        0 => 1,
        n => n,
    }
}

use mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server error code for unique index violations.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// True when `err` reports a unique index violation.
pub fn is_duplicate_key(err: &Error) -> bool {
    duplicate_key_message(err).is_some()
}

/// Name of the first field of the violated index, parsed from the server
/// message (`... dup key: { email: "a@b.co" }`).
pub fn duplicate_key_field(err: &Error) -> Option<String> {
    let message = duplicate_key_message(err)?;
    let (_, rest) = message.split_once("dup key: {")?;
    let (field, _) = rest.split_once(':')?;
    let field = field.trim();
    (!field.is_empty()).then(|| field.to_string())
}

fn duplicate_key_message(err: &Error) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY_CODE => {
            Some(e.message.as_str())
        }
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY_CODE => Some(e.message.as_str()),
        _ => None,
    }
}

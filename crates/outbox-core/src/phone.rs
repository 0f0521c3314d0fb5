//! Phone number canonicalization for the channel address form.

/// Fixed address suffix for individual chats on the channel.
const CHANNEL_ADDRESS_SUFFIX: &str = "@c.us";

/// Canonicalize a human-entered phone number into the channel's address form.
///
/// Strips every non-digit character and appends the fixed suffix:
/// `"+55 61 9501-0011"` becomes `"556195010011@c.us"`. Applying it to an
/// already canonical address is a no-op (the suffix carries no digits).
pub fn format_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    format!("{digits}{CHANNEL_ADDRESS_SUFFIX}")
}

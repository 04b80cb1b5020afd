use uuid::Uuid;

/// Ticket numbers look like `TKT-3FA85F64B217`: a fixed prefix plus twelve
/// uppercase hex characters drawn from a v4 UUID. Collisions are
/// cryptographically improbable and additionally rejected by the unique
/// column on registrations.
const TICKET_PREFIX: &str = "TKT-";
const TICKET_SUFFIX_LEN: usize = 12;

pub fn generate_ticket_number() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}{}", TICKET_PREFIX, &hex[..TICKET_SUFFIX_LEN])
}

/// Scan payload bound into the QR artifact:
/// `TICKET:<number>|EVENT:<event_id>|USER:<user_id>`.
pub fn encode_scan_payload(ticket_number: &str, event_id: Uuid, user_id: Uuid) -> String {
    format!("TICKET:{}|EVENT:{}|USER:{}", ticket_number, event_id, user_id)
}

/// Extract the ticket number from whatever the scanner hands us: either the
/// bare ticket number or the full structured payload. Case and surrounding
/// whitespace are normalized; resolution against the event happens at the
/// database lookup, so an event mismatch surfaces as `TicketNotFound` there.
pub fn extract_ticket_number(raw: &str) -> String {
    let code = raw.trim().to_uppercase();
    if let Some(rest) = code.strip_prefix("TICKET:") {
        rest.split('|').next().unwrap_or("").trim().to_string()
    } else {
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ticket_number_format() {
        let n = generate_ticket_number();
        assert!(n.starts_with("TKT-"));
        assert_eq!(n.len(), 4 + TICKET_SUFFIX_LEN);
        assert!(n[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(n, n.to_uppercase());
    }

    #[test]
    fn test_ticket_numbers_are_pairwise_unique() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generate_ticket_number()));
        }
    }

    #[test]
    fn test_scan_payload_roundtrip() {
        let event_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let payload = encode_scan_payload("TKT-0123456789AB", event_id, user_id);
        assert_eq!(extract_ticket_number(&payload), "TKT-0123456789AB");
    }

    #[test]
    fn test_extract_accepts_bare_ticket_number() {
        assert_eq!(
            extract_ticket_number("  tkt-0123456789ab \n"),
            "TKT-0123456789AB"
        );
    }

    #[test]
    fn test_extract_tolerates_truncated_payload() {
        assert_eq!(extract_ticket_number("TICKET:TKT-AAAA"), "TKT-AAAA");
        assert_eq!(extract_ticket_number("TICKET:"), "");
    }
}

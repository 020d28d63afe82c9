/// Allocates the next per-year sequence value. The upsert takes a row lock on the
/// year, so concurrent creations serialize instead of reading the same count.
pub const NEXT_SEQUENCE_SQL: &str = "INSERT INTO protocol_number_sequences (year, last_value) VALUES ($1, 1) \
     ON CONFLICT (year) DO UPDATE SET last_value = protocol_number_sequences.last_value + 1 \
     RETURNING last_value";

/// Human-readable protocol number, e.g. `2024-0007`
pub fn format_protocol_number(year: i32, sequence: i32) -> String {
    format!("{}-{:04}", year, sequence)
}

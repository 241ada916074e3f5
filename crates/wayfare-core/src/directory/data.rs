use super::Airport;

/// Raw records shipped with the binary, in declaration order.
pub fn bundled_airports() -> Result<Vec<Airport>, serde_json::Error> {
    serde_json::from_str(include_str!("airports.json"))
}

//! Raw form bodies and query strings for the park, exit and search
//! endpoints.
//!
//! Park and exit bodies are positional: keys are not inspected, the park
//! body is `<any>=<type>&<any>=<number>` and the exit body is
//! `<any>=<number>`. Search looks up the `vehicleNo` key. Values are taken
//! verbatim everywhere (no percent-decoding, `+` stays `+`), then trimmed
//! and uppercased by validation.

use parklot_core::{ValidationError, VehicleNo, VehicleType};

/// Decoded `POST /api/park` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkForm {
    pub vehicle_type: VehicleType,
    pub vehicle_no: VehicleNo,
}

/// Parses `type=<CAR|BIKE>&number=<vehicleNo>`.
pub fn parse_park_form(body: &str) -> Result<ParkForm, ValidationError> {
    let mut pairs = body.split('&');

    let raw_type = pairs.next().and_then(pair_value).ok_or_else(|| malformed("park"))?;
    let raw_number = pairs.next().and_then(pair_value).ok_or_else(|| malformed("park"))?;

    Ok(ParkForm {
        vehicle_type: raw_type.parse()?,
        vehicle_no: VehicleNo::parse(raw_number)?,
    })
}

/// Parses `<any>=<vehicleNo>[&...]`.
pub fn parse_exit_form(body: &str) -> Result<VehicleNo, ValidationError> {
    let raw = body
        .split('&')
        .next()
        .and_then(pair_value)
        .ok_or_else(|| malformed("exit"))?;

    VehicleNo::parse(raw)
}

/// Plate key of the `GET /api/search` query.
pub const SEARCH_KEY: &str = "vehicleNo";

/// Finds `vehicleNo=<v>` in a raw query string.
pub fn parse_search_query(query: Option<&str>) -> Result<VehicleNo, ValidationError> {
    let raw = query
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == SEARCH_KEY)
        .map(|(_, value)| value)
        .ok_or_else(|| ValidationError::Required {
            field: SEARCH_KEY.to_string(),
        })?;

    VehicleNo::parse(raw)
}

fn pair_value(pair: &str) -> Option<&str> {
    pair.split_once('=').map(|(_, value)| value)
}

fn malformed(form: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: format!("{form} form"),
        reason: "expected key=value pairs".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_park_form_is_positional() {
        let form = parse_park_form("type=car&number= up14ab1234 ").unwrap();
        assert_eq!(form.vehicle_type, VehicleType::Car);
        assert_eq!(form.vehicle_no.as_str(), "UP14AB1234");

        // key names are never looked at
        let form = parse_park_form("a=BIKE&b=KA01X1").unwrap();
        assert_eq!(form.vehicle_type, VehicleType::Bike);
        assert_eq!(form.vehicle_no.as_str(), "KA01X1");
    }

    #[test]
    fn test_park_form_rejects_bad_input() {
        assert!(matches!(
            parse_park_form("type=CAR"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_park_form("CAR&UP14"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_park_form("type=TRUCK&number=UP14"),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert!(matches!(
            parse_park_form("type=CAR&number="),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_exit_form_value_up_to_ampersand() {
        assert_eq!(parse_exit_form("vehicleNo=up14ab1234").unwrap().as_str(), "UP14AB1234");
        assert_eq!(parse_exit_form("x=KA01X1&extra=1").unwrap().as_str(), "KA01X1");
    }

    #[test]
    fn test_search_query_keeps_raw_value() {
        let no = parse_search_query(Some("vehicleNo=ka+01")).unwrap();
        assert_eq!(no.as_str(), "KA+01");

        let no = parse_search_query(Some("x=1&vehicleNo=KA%2002")).unwrap();
        assert_eq!(no.as_str(), "KA%2002");

        // same plate as the park body carried
        let parked = parse_park_form("type=CAR&number=KA+01").unwrap();
        assert_eq!(parse_search_query(Some("vehicleNo=KA+01")).unwrap(), parked.vehicle_no);
    }

    #[test]
    fn test_search_query_requires_plate() {
        assert!(matches!(
            parse_search_query(None),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_search_query(Some("number=KA01")),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_search_query(Some("vehicleNo=")),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_exit_form_rejects_bad_input() {
        assert!(parse_exit_form("").is_err());
        assert!(parse_exit_form("UP14AB1234").is_err());
        assert!(matches!(
            parse_exit_form("vehicleNo="),
            Err(ValidationError::Required { .. })
        ));
    }
}

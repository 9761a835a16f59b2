//! JSON encoding: a direct `serde_json` round trip. Field names are already
//! snake_case in [`crate::model`], so no renaming attributes are needed.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Error;

pub fn encode<T: Serialize>(record: &T) -> Result<String, Error> {
    serde_json::to_string(record).map_err(|e| Error::Schema { message: e.to_string() })
}

pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    serde_json::from_str(text).map_err(|e| Error::Schema { message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DevInfo, NetDev};

    fn sample() -> NetDev {
        NetDev {
            timestamp: 42,
            interfaces: vec![DevInfo {
                name: "eth0".into(),
                rx_bytes: 1000,
                rx_packets: 5,
                rx_errs: 0,
                rx_drop: 0,
                rx_fifo: 0,
                rx_frame: 0,
                rx_compressed: 0,
                rx_multicast: 0,
                tx_bytes: 2000,
                tx_packets: 10,
                tx_errs: 0,
                tx_drop: 0,
                tx_fifo: 0,
                tx_colls: 0,
                tx_carrier: 0,
                tx_compressed: 0,
            }],
        }
    }

    #[test]
    fn round_trips() {
        let text = encode(&sample()).unwrap();
        assert!(text.contains("\"rx_bytes\":1000"));
        let decoded: NetDev = decode(&text).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn rejects_malformed_json() {
        let result: Result<NetDev, Error> = decode("{not json");
        assert!(matches!(result, Err(Error::Schema { .. })));
    }
}

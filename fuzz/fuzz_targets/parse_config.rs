//! Fuzz harness for client config files (witintent.yaml / .json)

#![no_main]

use libfuzzer_sys::fuzz_target;
use witintent_config::ClientConfig;

fuzz_target!(|data: &[u8]| {
    let input = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    if let Ok(config) = serde_yaml::from_str::<ClientConfig>(input) {
        let _ = config.validate();
    }
    if let Ok(config) = serde_json::from_str::<ClientConfig>(input) {
        let _ = config.validate();
    }
});

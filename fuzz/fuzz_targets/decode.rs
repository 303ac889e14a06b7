#![no_main]
use libfuzzer_sys::fuzz_target;
use yid::{Codec, Config};

fuzz_target!(|data: &[u8]| {
    let codec = Codec::new(&Config::new().secure_key("random-key").pad_up(4));
    let input = String::from_utf8_lossy(data);
    if let Ok(num) = codec.decode(&input) {
        // Anything that decodes to an in-range number must encode back to a decodable string.
        if let Ok(encoded) = codec.encode_raw(num) {
            assert_eq!(codec.decode(&encoded), Ok(num));
        }
    }
});

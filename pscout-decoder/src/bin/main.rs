use std::io::Read;

use pscout_decoder::DecodedPayload;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let hex_payload = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let ts = chrono::Local::now().timestamp();
    match pscout_decoder::decode_hex(&hex_payload)? {
        DecodedPayload::Full(mut report) => {
            report.ts = ts;
            println!("{report}");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        DecodedPayload::Compact(mut report) => {
            report.ts = ts;
            println!("{report}");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

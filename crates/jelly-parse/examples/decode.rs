//! Run with: cargo run -p jelly-parse --example decode -- 'jelly-player://eyJtb2RlIjoi...'
//!
//! Decodes a handler URI and prints the request batch without launching anything.

fn main() {
    let Some(uri) = std::env::args().nth(1) else {
        eprintln!("usage: decode <uri>");
        std::process::exit(2);
    };

    match jelly_parse::parse_uri(&uri, "jelly-player") {
        Ok(batch) => {
            println!("Decoded {} request(s):", batch.len());
            for (i, request) in batch.iter().enumerate() {
                println!("  [{i}] {request:#?}");
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

//! Utility to explore ODS structure for development
use odsheets::container::{decode_xml_bytes, OdsContainer};
use odsheets::OdsReader;

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or("test-files/sample.ods".to_string());
    let container = OdsContainer::open(&path);

    println!("=== Files in archive ===");
    for file in container.list_files().expect("Failed to open file") {
        println!("  {}", file);
    }

    println!("\n=== mimetype ===");
    println!("{:?}", container.mimetype().ok().flatten());

    println!("\n=== content.xml (first 3000 chars) ===");
    match container.read_content().and_then(|bytes| decode_xml_bytes(&bytes)) {
        Ok(content) => {
            let end = content
                .char_indices()
                .nth(3000)
                .map_or(content.len(), |(i, _)| i);
            println!("{}", &content[..end]);
        }
        Err(e) => println!("ERROR: {}", e),
    }

    println!("\n=== Sheets ===");
    match OdsReader::from_container(container).sheets() {
        Ok(sheets) => {
            for (name, table) in sheets.iter() {
                println!("  {}: {} cells", name, table.len());
                for ((row, col), text) in table.iter().take(5) {
                    println!("    ({}, {}) {:?}", row, col, text);
                }
            }
        }
        Err(e) => println!("ERROR: {}", e),
    }
}

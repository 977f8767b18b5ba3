//! Benchmarks for odsheets extraction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks extract synthetic spreadsheets of various sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;

/// Builds the `content.xml` of a single sheet with the given number of rows.
fn create_content(row_count: usize) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content
    xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
    xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0"
    xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
  <office:body>
    <office:spreadsheet>
      <table:table table:name="Data">"#,
    );

    for i in 0..row_count {
        content.push_str(&format!(
            r#"
        <table:table-row>
          <table:table-cell><text:p>row {}</text:p></table:table-cell>
          <table:table-cell table:number-columns-repeated="2"/>
          <table:table-cell><text:p>{}</text:p></table:table-cell>
          <table:table-cell><text:p>first line</text:p><text:p>second line</text:p></table:table-cell>
          <table:table-cell table:number-columns-repeated="1019"/>
        </table:table-row>"#,
            i,
            i * 7
        ));
    }

    content.push_str(
        r#"
        <table:table-row table:number-rows-repeated="1048000">
          <table:table-cell table:number-columns-repeated="1024"/>
        </table:table-row>
      </table:table>
    </office:spreadsheet>
  </office:body>
</office:document-content>"#,
    );
    content
}

/// Creates a synthetic ODS package with the given number of rows.
fn create_test_ods(row_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("mimetype", options).unwrap();
    zip.write_all(b"application/vnd.oasis.opendocument.spreadsheet")
        .unwrap();

    zip.start_file("content.xml", options).unwrap();
    zip.write_all(create_content(row_count).as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer
}

/// Benchmark full package reads at various sizes.
fn bench_package_reading(c: &mut Criterion) {
    let mut group = c.benchmark_group("package_reading");

    for row_count in [10, 100, 1000, 5000].iter() {
        let data = create_test_ods(*row_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &data, |b, data| {
            b.iter(|| {
                let _ = odsheets::sheets_from_bytes(black_box(data.clone()));
            });
        });
    }

    group.finish();
}

/// Benchmark extraction from already decompressed XML.
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    for row_count in [10, 100, 1000].iter() {
        let xml = create_content(*row_count);

        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &xml, |b, xml| {
            b.iter(|| {
                let _ = odsheets::extract_sheets(black_box(xml.as_bytes()));
            });
        });
    }

    group.finish();
}

/// Benchmark JSON rendering of the string-keyed view.
fn bench_json_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_rendering");

    for row_count in [10, 100, 1000].iter() {
        let sheets = odsheets::sheets_from_bytes(create_test_ods(*row_count))
            .unwrap()
            .to_clean();

        group.bench_with_input(BenchmarkId::new("rows", row_count), &sheets, |b, sheets| {
            b.iter(|| {
                let _ = odsheets::render::to_json_default(black_box(sheets));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_package_reading,
    bench_extraction,
    bench_json_rendering,
);
criterion_main!(benches);

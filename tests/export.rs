use chrono::NaiveDate;
use layer_farm_dashboard::export::{to_csv_bytes, write_csv, Column, DisplayTable};
use layer_farm_dashboard::generate;

fn two_decimals(cell: &str) -> bool {
    match cell.split_once('.') {
        Some((int, frac)) => {
            !int.is_empty()
                && int.trim_start_matches('-').chars().all(|c| c.is_ascii_digit())
                && frac.len() == 2
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

#[test]
fn csv_has_header_plus_one_line_per_day() {
    let ds = generate(30, NaiveDate::from_ymd_opt(2024, 6, 30), Some(42)).unwrap();
    let csv = String::from_utf8(to_csv_bytes(&ds).unwrap()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 31);

    let labels: Vec<&str> = Column::ALL.iter().map(|c| c.label()).collect();
    assert_eq!(lines[0], labels.join(","));

    for line in &lines[1..] {
        let cells: Vec<&str> = line.split(',').collect();
        assert_eq!(cells.len(), Column::ALL.len());
        assert!(NaiveDate::parse_from_str(cells[0], "%Y-%m-%d").is_ok(), "bad date {}", cells[0]);
        for cell in &cells[1..] {
            assert!(two_decimals(cell), "not two decimals: {cell}");
        }
    }
    assert!(lines[30].starts_with("2024-06-30,85000.00,99710.00,"));
}

#[test]
fn csv_writer_matches_byte_helper() {
    let ds = generate(5, NaiveDate::from_ymd_opt(2024, 2, 27), Some(8)).unwrap();
    let mut buf = Vec::new();
    write_csv(&ds, &mut buf).unwrap();
    assert_eq!(buf, to_csv_bytes(&ds).unwrap());

    let table = DisplayTable::from_dataset(&ds);
    let dates: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(
        dates,
        vec!["2024-02-23", "2024-02-24", "2024-02-25", "2024-02-26", "2024-02-27"]
    );
}

#[test]
fn leap_day_is_part_of_the_axis() {
    let ds = generate(3, NaiveDate::from_ymd_opt(2024, 3, 1), Some(8)).unwrap();
    let table = DisplayTable::from_dataset(&ds);
    let dates: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(dates, vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
}

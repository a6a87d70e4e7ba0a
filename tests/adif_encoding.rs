use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;

use qsoupload::{
    adif::{END_OF_RECORD, encode_record, encode_records},
    types::{FieldValue, TabularRecord},
};

fn record(fields: &[(&str, FieldValue)]) -> TabularRecord {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Splits an encoded record into `(name, declared_len, value)` triples.
fn parse_tags(adif: &str) -> Vec<(String, usize, String)> {
    let body = adif.strip_suffix(END_OF_RECORD).expect("eor suffix");
    let mut out = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        let rest_tag = rest.strip_prefix('<').expect("tag open");
        let close = rest_tag.find('>').expect("tag close");
        let (name, len) = rest_tag[..close].rsplit_once(':').expect("len sep");
        let len: usize = len.parse().expect("len");
        let after = &rest_tag[close + 1..];
        let split = after
            .char_indices()
            .nth(len)
            .map(|(i, _)| i)
            .unwrap_or(after.len());
        out.push((name.to_string(), len, after[..split].to_string()));
        rest = &after[split..];
    }
    out
}

#[test]
fn encodes_reference_record() {
    let rec = record(&[
        ("call", "SP2JW".into()),
        ("rst_sent", "59".into()),
        ("band", "20m".into()),
    ]);
    assert_eq!(
        encode_record(&rec).as_str(),
        "<band:3>20m<call:5>SP2JW<rst_sent:2>59<eor>"
    );
}

#[test]
fn orders_fields_case_insensitively_and_lowercases_names() {
    let rec = record(&[("Call", "SP2JW".into()), ("Band", "20m".into()), ("mode", "CW".into())]);
    assert_eq!(
        encode_record(&rec).as_str(),
        "<band:3>20m<call:5>SP2JW<mode:2>CW<eor>"
    );
}

#[test]
fn empty_record_is_only_end_marker() {
    assert_eq!(encode_record(&TabularRecord::new()).as_str(), "<eor>");
}

#[test]
fn empty_values_emit_zero_length_tags() {
    let rec = record(&[("comment", "".into()), ("notes", FieldValue::Empty)]);
    assert_eq!(encode_record(&rec).as_str(), "<comment:0><notes:0><eor>");
}

#[test]
fn commas_become_periods() {
    let rec = record(&[("comment", "CQ, test".into()), ("freq", FieldValue::Text("14,074".into()))]);
    assert_eq!(
        encode_record(&rec).as_str(),
        "<comment:8>CQ. test<freq:6>14.074<eor>"
    );
}

#[test]
fn lengths_count_characters_not_bytes() {
    let rec = record(&[("name", "Łukasz".into()), ("qth", "Gdańsk".into())]);
    assert_eq!(
        encode_record(&rec).as_str(),
        "<name:6>Łukasz<qth:6>Gdańsk<eor>"
    );
}

#[test]
fn non_text_values_use_canonical_rendering() {
    let date = NaiveDate::from_ymd_opt(2023, 5, 14).expect("date");
    let time = NaiveTime::from_hms_opt(18, 30, 0).expect("time");
    let rec = record(&[
        ("freq", FieldValue::Float(14.074)),
        ("rst_rcvd", FieldValue::Float(59.0)),
        ("srx", FieldValue::Integer(7)),
        ("qsl_sent", FieldValue::Bool(true)),
        ("qso_date", FieldValue::Date(date)),
        ("time_on", FieldValue::Time(time)),
        ("stamp", FieldValue::DateTime(date.and_time(time))),
    ]);
    assert_eq!(
        encode_record(&rec).as_str(),
        "<freq:6>14.074<qsl_sent:4>true<qso_date:10>2023-05-14<rst_rcvd:2>59\
         <srx:1>7<stamp:19>2023-05-14 18:30:00<time_on:8>18:30:00<eor>"
    );
}

#[test]
fn encode_records_preserves_source_order() {
    let records = vec![
        record(&[("call", "K1ABC".into())]),
        record(&[("call", "SP2JW".into())]),
    ];
    let out: Vec<String> = encode_records(&records)
        .into_iter()
        .map(|r| r.into_string())
        .collect();
    assert_eq!(out, vec!["<call:5>K1ABC<eor>", "<call:5>SP2JW<eor>"]);
}

fn value_strategy() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        Just(FieldValue::Empty),
        ".{0,24}".prop_map(FieldValue::Text),
        any::<i64>().prop_map(FieldValue::Integer),
        (-1.0e6f64..1.0e6).prop_map(FieldValue::Float),
        any::<bool>().prop_map(FieldValue::Bool),
    ]
}

fn record_strategy() -> impl Strategy<Value = TabularRecord> {
    prop::collection::hash_map("[A-Za-z_][A-Za-z0-9_]{0,11}", value_strategy(), 0..12)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn encoding_is_deterministic_and_well_formed(rec in record_strategy()) {
        let first = encode_record(&rec);
        let second = encode_record(&rec.clone());
        prop_assert_eq!(&first, &second);

        let tags = parse_tags(first.as_str());
        prop_assert_eq!(tags.len(), rec.len());

        let names: Vec<&String> = tags.iter().map(|(n, _, _)| n).collect();
        let mut sorted = names.clone();
        sorted.sort();
        prop_assert_eq!(names, sorted);

        for (name, len, value) in &tags {
            prop_assert_eq!(name, &name.to_lowercase());
            prop_assert_eq!(*len, value.chars().count());
            prop_assert!(!value.contains(','));
        }
    }
}

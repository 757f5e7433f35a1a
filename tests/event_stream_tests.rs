use futures::StreamExt;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::{Decoder, FramedRead};

use voyager::payload::{DataSource, VisualizationUpdate};
use voyager::render::{Section, Visualizer};
use voyager::services::events::EventStreamCodec;
use voyager::Stage;

const UPDATE: &str = r#"{"context":{"weather":{"temperature":44,"conditions":"Sunny"},"venues":[{"name":"Louvre Abu Dhabi","type":"Museum","indoorActivity":true,"rating":4.8,"crowdLevel":"Low"}]},"decision":{"unsafe_activity":"Desert Safari","reason":"Outdoor temperature exceeds safety threshold (44°C)","confidence":0.85},"notification":{"original_plan":{"activities":[{"time":"11:00","activity":"Desert Safari","location":"Desert","is_outdoor":true}]},"new_plan":{"activities":[{"time":"11:00","activity":"Museum Visit","location":"Al Fahidi","is_outdoor":false}]},"message":"Plan changed"},"preferences":{"max_comfortable_temperature":40}}"#;

fn frame(json: &str) -> String {
    format!("data: {}\n\n", json)
}

#[test]
fn test_decodes_single_frame() {
    let mut codec = EventStreamCodec::new();
    let mut buf = BytesMut::from(frame(UPDATE).as_str());

    let update = codec.decode(&mut buf).expect("decode").expect("one update");
    let context = update.context.as_ref().expect("context");
    assert_eq!(context.weather.as_ref().map(|w| w.condition.as_str()), Some("Sunny"));
    assert!(context.venues[0].indoor);
    assert_eq!(context.venues[0].crowd_level, "Low");
    assert!(buf.is_empty());
}

#[test]
fn test_frame_split_across_reads() {
    let mut codec = EventStreamCodec::new();
    let whole = frame(UPDATE);
    let (head, tail) = whole.split_at(40);

    let mut buf = BytesMut::from(head);
    assert!(codec.decode(&mut buf).expect("decode").is_none(), "Partial frame yields nothing");

    buf.extend_from_slice(tail.as_bytes());
    assert!(codec.decode(&mut buf).expect("decode").is_some());
}

#[test]
fn test_multiline_data_is_joined() {
    let mut codec = EventStreamCodec::new();
    let mut buf = BytesMut::from("data: {\"decision\":\ndata: {\"reason\":\"energy\"}}\n\n");

    let update = codec.decode(&mut buf).expect("decode").expect("update");
    assert_eq!(update.decision.map(|d| d.reason), Some("energy".to_string()));
}

#[test]
fn test_comments_and_other_fields_are_skipped() {
    let mut codec = EventStreamCodec::new();
    let text = format!(": keep-alive\n\nevent: update\nid: 7\nretry: 1000\n{}", frame("{}"));
    let mut buf = BytesMut::from(text.as_str());

    let update = codec.decode(&mut buf).expect("decode").expect("update");
    assert_eq!(update, VisualizationUpdate::default());
}

#[test]
fn test_malformed_frame_is_dropped_and_stream_continues() {
    let mut codec = EventStreamCodec::new();
    let text = format!("data: {{not json\n\n{}", frame(UPDATE));
    let mut buf = BytesMut::from(text.as_str());

    // VERIFY: the bad frame is skipped, the next one still decodes
    let update = codec.decode(&mut buf).expect("decode").expect("second frame");
    assert!(update.decision.is_some());
}

#[test]
fn test_crlf_line_endings() {
    let mut codec = EventStreamCodec::new();
    let mut buf = BytesMut::from("data: {}\r\n\r\n");
    assert!(codec.decode(&mut buf).expect("decode").is_some());
}

#[test]
fn test_eof_flushes_unterminated_frame() {
    let mut codec = EventStreamCodec::new();
    let mut buf = BytesMut::from("data: {\"preferences\":{\"budget_level\":\"luxury\"}}");

    assert!(codec.decode(&mut buf).expect("decode").is_none());
    let update = codec.decode_eof(&mut buf).expect("decode").expect("flushed update");
    assert_eq!(
        update.preferences.and_then(|p| p.budget_level),
        Some("luxury".to_string())
    );
}

#[test]
fn test_visualizer_renders_every_section() {
    let update: VisualizationUpdate = serde_json::from_str(UPDATE).expect("valid update");
    let fragments = Visualizer::new().apply(&update);

    let sections: Vec<Section> = fragments.iter().map(|f| f.section).collect();
    assert_eq!(
        sections,
        vec![
            Section::Stage(Stage::Perception),
            Section::Stage(Stage::Reasoning),
            Section::Stage(Stage::Action),
            Section::Stage(Stage::Learning),
            Section::DataSources,
        ]
    );

    assert!(fragments[0].markup.contains("Louvre Abu Dhabi"));
    assert!(fragments[1].markup.contains("#4CAF50"));
    assert!(fragments[2].markup.contains(r#"<span class="tag outdoor">Outdoor</span>"#));
    assert!(fragments[2].markup.contains("Museum Visit"));
    assert!(fragments[3].markup.contains("40°C"));
    assert!(fragments[4].markup.contains("OpenWeatherMap"), "Default source list when none is pushed");
}

#[test]
fn test_visualizer_handles_empty_update() {
    let fragments = Visualizer::new().apply(&VisualizationUpdate::default());
    assert_eq!(fragments.len(), 5);
    assert!(fragments[0].markup.contains("No weather data"));
    assert!(fragments[3].markup.contains("No preference data available"));
}

#[test]
fn test_visualizer_uses_pushed_sources() {
    let update = VisualizationUpdate {
        data_sources: Some(vec![DataSource::new("Visit Dubai", "Local Info", "degraded")]),
        ..VisualizationUpdate::default()
    };
    let fragments = Visualizer::new().apply(&update);
    let sources = &fragments[4].markup;
    assert!(sources.contains("Visit Dubai"));
    assert!(sources.contains("source-item degraded"));
    assert!(!sources.contains("OpenWeatherMap"));
}

#[tokio::test]
async fn test_invalid_utf8_does_not_end_the_stream() {
    let mut body = frame(UPDATE).into_bytes();
    body.extend_from_slice(b": comment \xff\xfe\n\n");
    body.extend_from_slice(b"data: {\"decision\":{\"reason\":\"caf\xe9\"}}\n\n");
    body.extend_from_slice(frame(r#"{"preferences":{"budget_level":"luxury"}}"#).as_bytes());

    let mut frames = FramedRead::new(&body[..], EventStreamCodec::new());
    let mut updates = Vec::new();
    while let Some(item) = frames.next().await {
        updates.push(item.expect("decoding never fails on bad bytes"));
    }

    // VERIFY: both valid frames arrive, the lossy one decodes with a replacement char
    assert_eq!(updates.len(), 3);
    assert!(updates[0].context.is_some());
    assert_eq!(
        updates[1].decision.as_ref().map(|d| d.reason.as_str()),
        Some("caf\u{FFFD}")
    );
    assert_eq!(
        updates[2].preferences.as_ref().and_then(|p| p.budget_level.as_deref()),
        Some("luxury")
    );
}

#[test]
fn test_frame_with_naive_timestamps_is_decoded() {
    let json = r#"{"context":{"weather":{"temperature":45,"conditions":"sunny","last_updated":"2025-06-01T14:03:22.123456"},"time_context":{"local_time":"2025-06-01T14:03:22.123456","day_of_week":"Sunday","time_of_day":"afternoon"}}}"#;
    let mut codec = EventStreamCodec::new();
    let mut buf = BytesMut::from(frame(json).as_str());

    let update = codec.decode(&mut buf).expect("decode").expect("frame is kept");
    let fragments = Visualizer::new().apply(&update);
    assert!(fragments[0].markup.contains("45°C"));
    assert!(fragments[0].markup.contains("14:03:22"));
    assert!(fragments[0].markup.contains("Sunday"));
}

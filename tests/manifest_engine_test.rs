use flight_manifest::core::manifest::{CSV_OUTPUT, JSON_OUTPUT};
use flight_manifest::core::ConfigProvider;
use flight_manifest::{LocalStorage, ManifestEngine, ManifestError};
use tempfile::TempDir;

struct TestConfig {
    input: String,
    output: String,
    formats: Vec<String>,
}

impl ConfigProvider for TestConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }
}

const REQUESTS: &str = r#"[
  {
    "flightCode": "IB0001",
    "capacity": 2,
    "passengers": [
      {"id": 1, "name": "Lucia", "age": 41, "flightCategory": "Normal", "reservationId": "R1"},
      {"id": 2, "name": "Mateo", "age": 9, "flightCategory": "Black", "reservationId": "R2", "hasConnections": true},
      {"id": 3, "name": "Sara", "age": 38, "flightCategory": "Gold", "reservationId": "R2"}
    ]
  },
  {
    "flightCode": "VY0002",
    "capacity": 1,
    "passengers": [
      {"id": 7, "name": "Pablo", "age": 50, "flightCategory": "Gold", "reservationId": "R7"},
      {"id": 7, "name": "Pablo", "age": 50, "flightCategory": "Gold", "reservationId": "R7"}
    ]
  }
]"#;

fn setup(formats: &[&str]) -> (TempDir, ManifestEngine<LocalStorage, TestConfig>) {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("flights.json");
    std::fs::write(&input, REQUESTS).unwrap();

    let config = TestConfig {
        input: input.to_str().unwrap().to_string(),
        output: temp_dir.path().join("out").to_str().unwrap().to_string(),
        formats: formats.iter().map(|f| f.to_string()).collect(),
    };
    let engine = ManifestEngine::new(LocalStorage::new(".".to_string()), config);
    (temp_dir, engine)
}

#[tokio::test]
async fn test_run_writes_json_envelope_report() {
    let (temp_dir, engine) = setup(&["json"]);

    let written = engine.run().await.unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with(JSON_OUTPUT));

    let raw = std::fs::read(temp_dir.path().join("out").join(JSON_OUTPUT)).unwrap();
    let report: serde_json::Value = serde_json::from_slice(&raw).unwrap();

    assert_eq!(report["success"], true);
    assert_eq!(report["count"], 2);

    let first = &report["data"][0];
    assert_eq!(first["success"], true);
    assert_eq!(first["data"]["flightCode"], "IB0001");
    let boarded: Vec<i64> = first["data"]["boardedPassengers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(boarded, vec![2, 3]);
    assert_eq!(first["data"]["passengersOnWaitingList"][0]["id"], 1);
    assert_eq!(first["data"]["passengersOnWaitingList"][0]["boarded"], false);
    assert_eq!(first["data"]["boardedPassengers"][0]["hasConnections"], true);

    let second = &report["data"][1];
    assert_eq!(second["success"], false);
    assert!(second["error"].as_str().unwrap().contains("VY0002"));
    assert!(second.get("data").is_none());
}

#[tokio::test]
async fn test_run_writes_csv_boarding_list() {
    let (temp_dir, engine) = setup(&["json", "csv"]);

    let written = engine.run().await.unwrap();
    assert_eq!(written.len(), 2);

    let csv = std::fs::read_to_string(temp_dir.path().join("out").join(CSV_OUTPUT)).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "flight_code,passenger_id,name,category,reservation_id,boarded"
    );
    assert_eq!(lines[1], "IB0001,2,Mateo,Black,R2,true");
    assert_eq!(lines[2], "IB0001,3,Sara,Gold,R2,true");
    assert_eq!(lines[3], "IB0001,1,Lucia,Normal,R1,false");
    assert_eq!(lines.len(), 4);
}

#[tokio::test]
async fn test_missing_input_is_io_error() {
    let (temp_dir, _) = setup(&["json"]);
    let config = TestConfig {
        input: temp_dir.path().join("nope.json").to_str().unwrap().to_string(),
        output: temp_dir.path().to_str().unwrap().to_string(),
        formats: vec!["json".to_string()],
    };
    let engine = ManifestEngine::new(LocalStorage::new(".".to_string()), config);

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, ManifestError::IoError(_)));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_unknown_category_rejects_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("flights.json");
    std::fs::write(
        &input,
        r#"[{"flightCode": "IB1", "capacity": 1, "passengers": [
            {"id": 1, "name": "A", "age": 1, "flightCategory": "Diamond", "reservationId": "R"}
        ]}]"#,
    )
    .unwrap();

    let config = TestConfig {
        input: input.to_str().unwrap().to_string(),
        output: temp_dir.path().to_str().unwrap().to_string(),
        formats: vec!["json".to_string()],
    };
    let engine = ManifestEngine::new(LocalStorage::new(".".to_string()), config);

    let err = engine.read_requests().await.unwrap_err();
    assert!(matches!(err, ManifestError::SerializationError(_)));
    assert!(err.to_string().contains("Diamond"));
}

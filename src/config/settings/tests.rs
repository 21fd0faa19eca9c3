use super::*;
use serial_test::serial;
use tempfile::TempDir;

#[test]
fn default_config() {
    let config = Config::default();
    assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
    assert_eq!(config.openai.embedding_model, "text-embedding-ada-002");
    assert_eq!(config.openai.chat_model, "gpt-4o-mini");
    assert_eq!(config.openai.max_tokens, 150);
    assert!((config.openai.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(config.qdrant.port, 6333);
    assert_eq!(config.qdrant.collection, "txt_vector_collection");
    assert_eq!(config.qdrant.vector_size, 1536);
    assert_eq!(config.materials.dir, PathBuf::from("materials"));
}

#[test]
fn config_validation() {
    let config = Config::default();
    assert!(config.validate().is_ok());

    let mut invalid_config = config.clone();
    invalid_config.qdrant.protocol = "ftp".to_string();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.qdrant.port = 0;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.qdrant.collection = "  ".to_string();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.qdrant.vector_size = 0;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.openai.chat_model = String::new();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.openai.temperature = 2.5;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.openai.base_url = "ftp://example.com".to_string();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config;
    invalid_config.server.port = 0;
    assert!(invalid_config.validate().is_err());
}

#[test]
fn qdrant_url_generation() {
    let config = Config::default();
    let url = config
        .qdrant_url()
        .expect("should generate qdrant_url successfully");
    assert_eq!(url.as_str(), "http://localhost:6333/");
}

#[test]
fn toml_serialization_skips_api_key() {
    let mut config = Config::default();
    config.openai.api_key = Some("sk-secret".to_string());

    let toml_str = toml::to_string(&config).expect("should serialize toml correctly");
    assert!(!toml_str.contains("sk-secret"));

    let parsed_config: Config = toml::from_str(&toml_str).expect("should parse toml correctly");
    assert_eq!(parsed_config.openai.api_key, None);
    assert_eq!(parsed_config.qdrant, config.qdrant);
    assert_eq!(parsed_config.server, config.server);
}

#[test]
fn setter_validation() {
    let mut qdrant = QdrantConfig::default();
    assert!(qdrant.set_protocol("https".to_string()).is_ok());
    assert!(qdrant.set_host("qdrant.internal".to_string()).is_ok());
    assert!(qdrant.set_port(6334).is_ok());
    assert!(qdrant.set_collection("notes".to_string()).is_ok());

    assert!(qdrant.set_protocol("ftp".to_string()).is_err());
    assert!(qdrant.set_host(String::new()).is_err());
    assert!(qdrant.set_port(0).is_err());
    assert!(qdrant.set_collection(String::new()).is_err());

    let mut openai = OpenAiConfig::default();
    assert!(openai.set_base_url("http://localhost:8080/v1".to_string()).is_ok());
    assert!(openai.set_chat_model("gpt-4o".to_string()).is_ok());
    assert!(openai.set_max_tokens(512).is_ok());
    assert!(openai.set_temperature(0.0).is_ok());

    assert!(openai.set_base_url("not a url".to_string()).is_err());
    assert!(openai.set_embedding_model("   ".to_string()).is_err());
    assert!(openai.set_max_tokens(0).is_err());
    assert!(openai.set_temperature(-0.1).is_err());
    assert_eq!(openai.base_url, "http://localhost:8080/v1");
}

#[test]
#[serial]
fn load_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    // SAFETY: serialized with every other test that touches the environment
    unsafe { env::set_var(API_KEY_ENV, "sk-test") };

    let config = Config::load(temp_dir.path()).expect("config should load");

    // SAFETY: as above
    unsafe { env::remove_var(API_KEY_ENV) };

    assert_eq!(config.qdrant, QdrantConfig::default());
    assert_eq!(config.get_base_dir(), temp_dir.path());
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
}

#[test]
#[serial]
fn save_then_load() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let mut config = Config {
        base_dir: temp_dir.path().join("nested"),
        ..Config::default()
    };
    config.qdrant.collection = "course_notes".to_string();
    config.server.port = 9000;

    config.save().expect("config should save");
    assert!(config.config_file_path().exists());

    let loaded = Config::load(temp_dir.path().join("nested")).expect("config should load");
    assert_eq!(loaded.qdrant.collection, "course_notes");
    assert_eq!(loaded.server.port, 9000);
}

#[test]
#[serial]
fn load_rejects_invalid_file() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    fs::write(
        temp_dir.path().join("config.toml"),
        "[qdrant]\nprotocol = \"ftp\"\n",
    )
    .expect("should write config");

    assert!(Config::load(temp_dir.path()).is_err());
}

#[test]
#[serial]
fn config_dir_env_override() {
    // SAFETY: serialized with every other test that touches the environment
    unsafe { env::set_var(CONFIG_DIR_ENV, "/tmp/rag-demo-test") };
    let dir = Config::config_dir();
    // SAFETY: as above
    unsafe { env::remove_var(CONFIG_DIR_ENV) };

    assert_eq!(
        dir.expect("config dir resolves"),
        PathBuf::from("/tmp/rag-demo-test")
    );
}

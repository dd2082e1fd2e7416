use sentiment_web::{BuiltinModel, ModelError, ModelInfo, ModelManager};

#[test]
fn test_model_paths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let info = BuiltinModel::TwitterRoberta.get_model_info();

    let model_path = manager.get_model_path(&info.name);
    let tokenizer_path = manager.get_tokenizer_path(&info.name);

    assert!(model_path.ends_with("Xenova--twitter-roberta-base-sentiment-latest/model.onnx"));
    assert!(tokenizer_path.ends_with("Xenova--twitter-roberta-base-sentiment-latest/tokenizer.json"));
    assert!(!manager.is_model_downloaded(&info.name));
    Ok(())
}

#[test]
fn test_verification_of_missing_model() -> Result<(), ModelError> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    assert!(!manager.verify_model(&ModelInfo::from_hub_repo("org/missing"))?);
    Ok(())
}

#[tokio::test]
#[ignore = "downloads the model from the hub"]
async fn test_model_download() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let info = BuiltinModel::TwitterRoberta.get_model_info();

    manager.ensure_model_downloaded(&info).await?;
    assert!(manager.is_model_downloaded(&info.name));
    assert!(manager.verify_model(&info)?);

    manager.remove_download(&info.name)?;
    assert!(!manager.is_model_downloaded(&info.name));
    Ok(())
}

use std::path::PathBuf;

pub fn is_file_exist(file_path: &str) -> Result<String, String> {
    let file_path = PathBuf::from(file_path);

    if file_path.exists() && file_path.is_file() {
        Ok(file_path.to_string_lossy().to_string())
    } else {
        Err(format!("file not found: {}", file_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn existing_file_returns_ok() {
        let dir = std::env::temp_dir().join("s3probe_test_file_exist");
        fs::create_dir_all(&dir).unwrap();
        let file_path = dir.join("cert.pem");
        fs::write(&file_path, "-----BEGIN CERTIFICATE-----").unwrap();

        let result = is_file_exist(file_path.to_str().unwrap());
        assert!(result.is_ok());
        assert_eq!(PathBuf::from(result.unwrap()), file_path);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn nonexistent_file_returns_err() {
        let result = is_file_exist("/nonexistent/path/to/key.pem");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("file not found"));
    }

    #[test]
    fn directory_returns_err() {
        let dir = std::env::temp_dir().join("s3probe_test_dir_not_file");
        fs::create_dir_all(&dir).unwrap();

        let result = is_file_exist(dir.to_str().unwrap());
        assert!(result.is_err());

        let _ = fs::remove_dir_all(&dir);
    }
}

use tokio::{fs, io::AsyncWriteExt};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

pub fn read_config<'a, T>(file_name: &str, env_prefix: Option<&str>) -> T
where
    T: Deserialize<'a>,
{
    let mut config_builder = Config::builder().add_source(File::new(file_name, FileFormat::Toml));

    if let Some(env_prefix) = env_prefix {
        config_builder = config_builder.add_source(Environment::with_prefix(env_prefix));
    }

    let data = config_builder.build();

    // Unwrap here because without config application cannot be run
    data.unwrap().try_deserialize().unwrap()
}

pub fn replace_home_dir(file_name: &str) -> String {
    let path_buf = std::path::PathBuf::from(file_name);
    path_buf
        .iter()
        .map(|dir| {
            if dir == "~" {
                std::env::var("HOME").unwrap()
            } else {
                dir.to_str().unwrap().to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a record from local storage.
///
/// Returns `None` if the file is absent or its contents do not parse.
/// Local records are a best-effort cache, so corruption is treated the
/// same as an empty file rather than an error.
pub async fn read_local_storage<T>(file_name: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    let file_name = replace_home_dir(file_name);
    let file_contents = fs::read_to_string(&file_name).await.ok()?;

    match toml::from_str::<T>(&file_contents) {
        Ok(value) => Some(value),
        Err(parse_error) => {
            tracing::warn!(%file_name, ?parse_error, "discarding malformed local record");
            None
        }
    }
}

/// Write the given record to local storage, creating parent directories
/// as needed. Failures are logged and swallowed.
pub async fn write_local_storage<T>(file_name: &str, data: T)
where
    T: serde::Serialize,
{
    let file_name = replace_home_dir(file_name);

    let file_contents = match toml::to_string(&data) {
        Ok(contents) => contents,
        Err(serialize_error) => {
            tracing::error!(%file_name, ?serialize_error, "cannot encode local record");
            return;
        }
    };

    if let Some(parent) = std::path::Path::new(&file_name).parent() {
        let _ = fs::create_dir_all(parent).await;
    }

    if fs::write(&file_name, file_contents.as_bytes()).await.is_err() {
        let file = fs::File::create(&file_name).await;

        match file {
            Ok(mut file) => {
                if let Err(write_error) = file.write_all(file_contents.as_bytes()).await {
                    tracing::error!(%file_name, ?write_error, "cannot write local record");
                }
            }
            Err(create_error) => {
                tracing::error!(%file_name, ?create_error, "cannot create local record");
            }
        }
    }
}

#![deny(warnings)]

//! Rewrite a save file at the current schema version.
//!
//! `migrate [--dir DIR] [--key KEY] [--format json|bincode] [--to json|bincode]`

use anyhow::{bail, Context, Result};
use idle_core::SystemClock;
use persistence::{
    default_save_dir, FileStore, SaveFormat, SaveService, XorCipher, DEFAULT_CIPHER_KEY,
};
use std::path::PathBuf;
use std::sync::Arc;

struct Args {
    dir: Option<PathBuf>,
    key: String,
    from: SaveFormat,
    to: Option<SaveFormat>,
}

fn parse_format(value: Option<String>) -> Result<SaveFormat> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("json") => Ok(SaveFormat::Json),
        Some("bincode") => Ok(SaveFormat::Bincode),
        other => bail!("unknown save format {other:?}, expected json or bincode"),
    }
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        dir: None,
        key: DEFAULT_CIPHER_KEY.to_string(),
        from: SaveFormat::Json,
        to: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--dir" => args.dir = it.next().map(PathBuf::from),
            "--key" => args.key = it.next().unwrap_or_default(),
            "--format" => args.from = parse_format(it.next())?,
            "--to" => args.to = Some(parse_format(it.next())?),
            _ => {}
        }
    }
    Ok(args)
}

fn service(store: FileStore, key: &str, format: SaveFormat) -> Result<SaveService> {
    Ok(
        SaveService::new(Box::new(store), Arc::new(SystemClock))
            .with_cipher(Box::new(XorCipher::new(key)?))
            .with_format(format),
    )
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let dir = match args.dir {
        Some(dir) => dir,
        None => default_save_dir()?,
    };
    let store = FileStore::in_dir(&dir)
        .with_context(|| format!("Failed to open save directory {}", dir.display()))?;
    let path = store.path().to_path_buf();

    let reader = service(store.clone(), &args.key, args.from)?;
    let Some(model) = reader
        .read_model()
        .with_context(|| format!("Failed to read {}", path.display()))?
    else {
        println!("No save at {}", path.display());
        return Ok(());
    };

    let mut writer = service(store, &args.key, args.to.unwrap_or(args.from))?;
    writer.write_model(&model)?;
    println!(
        "Save at {} migrated to version {} ({:?})",
        path.display(),
        model.version,
        writer.format()
    );
    Ok(())
}

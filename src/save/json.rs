use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::id::PlayerId;
use crate::model::{PlayerSave, SaveDefaults};

/// Canonical location of a player's save inside a save directory.
pub fn save_path(save_dir: &Path, player: PlayerId) -> PathBuf {
    save_dir.join(format!("playerdata_{player}.json"))
}

/// Write a save as pretty-printed JSON, creating parent directories as
/// needed.
pub fn save_player(path: &Path, save: &PlayerSave) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, save)?;
    writer.flush()
}

/// Read a save from disk. `Ok(None)` when no file exists yet.
pub fn load_player(path: &Path) -> io::Result<Option<PlayerSave>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };
    let save = serde_json::from_str(&contents)?;
    Ok(Some(save))
}

/// Load a save, falling back to a fresh record when the file is missing or
/// unreadable. The fresh record is written back right away so the next load
/// finds it. A corrupt save is logged and replaced, never fatal.
pub fn load_or_create(path: &Path, defaults: &SaveDefaults) -> PlayerSave {
    match load_player(path) {
        Ok(Some(save)) => {
            tracing::info!(
                "player data loaded from {} (level {}, {} money)",
                path.display(),
                save.level,
                save.money
            );
            return save;
        }
        Ok(None) => {
            tracing::info!("no save file at {}, creating new player data", path.display());
        }
        Err(err) => {
            tracing::error!("failed to load player data from {}: {}", path.display(), err);
        }
    }
    let save = PlayerSave::fresh(defaults);
    if let Err(err) = save_player(path, &save) {
        tracing::error!(
            "failed to write fresh player data to {}: {}",
            path.display(),
            err
        );
    }
    save
}

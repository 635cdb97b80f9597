use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

use super::nmea::NmeaReader;
use crate::domain::{Position, Trajectory};

/// Loads one trip. `.json` files hold a serialized position list; anything else is read as NMEA text.
/// The trajectory is labelled with the file name.
pub fn load_trajectory(path: &Path) -> Result<Trajectory> {
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let positions: Vec<Position> = if is_json {
        serde_json::from_reader(reader).with_context(|| format!("parsing positions from {}", path.display()))?
    } else {
        let mut nmea = NmeaReader::new();
        let positions = nmea.read(reader).with_context(|| format!("reading {}", path.display()))?;
        let stats = nmea.stats();
        if stats.malformed > 0 {
            log::warn!("{}: skipped {} malformed of {} lines", label, stats.malformed, stats.lines);
        }
        positions
    };

    log::info!("loaded {} positions from {}", positions.len(), label);
    Ok(Trajectory::new(label, positions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mph;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gps-cost-map-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn json_extension_loads_position_list() {
        let positions = vec![Position::new(
            42.0,
            -83.0,
            Some(Mph::new(12.5)),
            Utc.with_ymd_and_hms(2019, 3, 19, 14, 0, 0).unwrap(),
        )];
        let path = scratch_file("trip.JSON", &serde_json::to_string(&positions).unwrap());

        let trajectory = load_trajectory(&path).unwrap();
        assert_eq!(trajectory.label, "trip.JSON");
        assert_eq!(trajectory.positions, positions);
    }

    #[test]
    fn other_extensions_are_nmea() {
        let log = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\nnoise\n";
        let path = scratch_file("2019_03_19.txt", log);

        let trajectory = load_trajectory(&path).unwrap();
        assert_eq!(trajectory.label, "2019_03_19.txt");
        assert_eq!(trajectory.len(), 1);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_trajectory(Path::new("/definitely/not/here.nmea")).unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.nmea"));
    }

    #[test]
    fn broken_json_is_an_error() {
        let path = scratch_file("broken.json", "[{\"latitude\": 1.0");
        assert!(load_trajectory(&path).is_err());
    }
}

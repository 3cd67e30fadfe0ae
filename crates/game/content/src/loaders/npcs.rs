//! Town resident loader.

use std::path::Path;

use serde::Deserialize;
use undercity_core::{NpcProfile, SystemNpcProfile};

use crate::loaders::{LoadResult, read_file};

/// Contents of `npcs.ron`: scheduled residents and stationary service characters.
#[derive(Clone, Debug, Deserialize)]
pub struct NpcCatalog {
    pub npcs: Vec<NpcProfile>,
    #[serde(default)]
    pub system_npcs: Vec<SystemNpcProfile>,
}

pub struct NpcLoader;

impl NpcLoader {
    pub fn load(path: &Path) -> LoadResult<NpcCatalog> {
        let content = read_file(path)?;
        let catalog: NpcCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse npc RON at {}: {}", path.display(), e))?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use undercity_core::env::NarrativeMemory;
    use undercity_core::npc::scheduled_goal;
    use undercity_core::state::{GoalKind, TimePeriod};
    use undercity_core::{NarrativeOracle, NarrativeValue};

    const RESIDENT: &str = r#"(
        npcs: [
            (
                id: "ivo",
                appearance: (glyph: 'i', name: "Ivo"),
                spawn: (x: 3, y: 3),
                anchors: (
                    home: (x: 1, y: 1),
                    cafe: (x: 5, y: 1),
                    terminal: (x: 5, y: 4),
                    garden: (x: 2, y: 4),
                ),
                pace: 2,
                wants_talk: false,
                appears_on_day: 1,
                schedule: (
                    rules: [
                        (
                            when: Flag("lockdown"),
                            then: (morning: Home, afternoon: Home, evening: Home, night: Home),
                        ),
                    ],
                    fallback: (morning: Terminal, afternoon: Cafe, evening: Wander, night: Home),
                ),
            ),
        ],
    )"#;

    #[test]
    fn schedules_round_through_ron() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{RESIDENT}").unwrap();
        let catalog = NpcLoader::load(file.path()).unwrap();
        assert!(catalog.system_npcs.is_empty());

        let ivo = &catalog.npcs[0];
        assert_eq!(ivo.pace, 2);
        let mut narrative = NarrativeMemory::default();
        assert_eq!(
            scheduled_goal(&ivo.schedule, &narrative, TimePeriod::Morning),
            GoalKind::Terminal
        );
        narrative.set_variable("lockdown", NarrativeValue::Bool(true), "test");
        assert_eq!(
            scheduled_goal(&ivo.schedule, &narrative, TimePeriod::Morning),
            GoalKind::Home
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = NpcLoader::load(&dir.path().join("npcs.ron")).unwrap_err();
        assert!(error.to_string().contains("Failed to read file"));
    }
}

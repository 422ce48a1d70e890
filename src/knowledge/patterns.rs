use super::StoreError;
use crate::nlp::topics::Topic;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Thematic-cohesion phrases per topic, backed by `patterns.json`. The
/// generator sprinkles these into replies to keep a conversation thread
/// recognizable.
pub struct PatternBank {
    path: PathBuf,
    entries: BTreeMap<String, Vec<String>>,
}

impl PatternBank {
    pub fn open(data_dir: &std::path::Path) -> Self {
        let path = data_dir.join("patterns.json");
        let entries = super::load_or_init(&path, default_patterns);
        Self { path, entries }
    }

    /// Union of the phrases for the given topics, shuffled and truncated.
    /// No topics means no patterns.
    pub fn thematic_patterns(
        &self,
        topics: &[Topic],
        limit: usize,
        rng: &mut impl Rng,
    ) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        for topic in topics {
            if let Some(phrases) = self.entries.get(topic.label()) {
                for phrase in phrases {
                    if !all.contains(phrase) {
                        all.push(phrase.clone());
                    }
                }
            }
        }
        all.shuffle(rng);
        all.truncate(limit);
        all
    }

    /// Register a phrase for a topic and persist. Returns false when it is
    /// already present.
    pub fn add(&mut self, topic: Topic, phrase: &str) -> Result<bool, StoreError> {
        let list = self.entries.entry(topic.label().to_string()).or_default();
        if list.iter().any(|p| p == phrase) {
            return Ok(false);
        }
        list.push(phrase.to_string());
        super::persist(&self.path, &self.entries)?;
        Ok(true)
    }
}

fn default_patterns() -> BTreeMap<String, Vec<String>> {
    let mut entries = BTreeMap::new();
    let mut put = |topic: &str, phrases: &[&str]| {
        entries.insert(
            topic.to_string(),
            phrases.iter().map(|s| s.to_string()).collect(),
        );
    };

    put(
        "minecraft",
        &[
            "construções em survival",
            "configuração de servidores",
            "otimização de chunks e mobs",
        ],
    );
    put(
        "moderacao",
        &[
            "regras de convivência do servidor",
            "uso de timeout e limpeza de canal",
        ],
    );
    put(
        "xadrez",
        &[
            "aberturas clássicas",
            "táticas de meio-jogo",
            "finais de torre",
        ],
    );
    put(
        "filosofia",
        &[
            "dialética hegeliana",
            "imperativo categórico de Kant",
            "reflexões sobre tecnologia",
        ],
    );
    put(
        "suporte",
        &["diagnóstico de erros comuns", "coleta de detalhes do problema"],
    );

    entries
}

use super::StoreError;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Phrases that signal the bot got something wrong, and apology templates
/// per error class. Backed by `errors.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionRule {
    pub patterns: Vec<String>,
    pub responses: Vec<String>,
}

pub struct CorrectionBank {
    path: PathBuf,
    entries: BTreeMap<String, CorrectionRule>,
}

impl CorrectionBank {
    pub fn open(data_dir: &std::path::Path) -> Self {
        let path = data_dir.join("errors.json");
        let entries = super::load_or_init(&path, default_corrections);
        Self { path, entries }
    }

    /// Detect whether the user is flagging an error; returns the error
    /// class key.
    pub fn detect_error(&self, message: &str) -> Option<&str> {
        let lower = message.to_lowercase();
        self.entries
            .iter()
            .find(|(_, rule)| rule.patterns.iter().any(|p| lower.contains(p.as_str())))
            .map(|(key, _)| key.as_str())
    }

    /// Pick an apology template for the class, filling `{correction}` when
    /// a correction text is known.
    pub fn generate_correction(
        &self,
        error_type: &str,
        correction: Option<&str>,
        rng: &mut impl Rng,
    ) -> Option<String> {
        let rule = self.entries.get(error_type)?;
        let template = rule.responses.choose(rng)?;
        let filled = template.replace(
            "{correction}",
            correction.unwrap_or("vou verificar e te retorno"),
        );
        Some(filled)
    }

    /// Register a new error class and persist. Returns false when the key
    /// already exists.
    pub fn add(&mut self, key: &str, rule: CorrectionRule) -> Result<bool, StoreError> {
        if self.entries.contains_key(key) {
            return Ok(false);
        }
        self.entries.insert(key.to_string(), rule);
        super::persist(&self.path, &self.entries)?;
        Ok(true)
    }
}

fn default_corrections() -> BTreeMap<String, CorrectionRule> {
    let mut entries = BTreeMap::new();

    entries.insert(
        "informacao_incorreta".to_string(),
        CorrectionRule {
            patterns: vec![
                "isso não está certo".into(),
                "informação errada".into(),
                "incorreto".into(),
                "não é verdade".into(),
            ],
            responses: vec![
                "Peço desculpas pela informação incorreta. A informação correta é: {correction}".into(),
                "Você está certo, cometi um erro. A informação correta é: {correction}".into(),
                "Obrigada pela correção. Você está certo, {correction}".into(),
            ],
        },
    );
    entries.insert(
        "comando_errado".to_string(),
        CorrectionRule {
            patterns: vec![
                "comando não funciona".into(),
                "comando errado".into(),
                "não é esse comando".into(),
            ],
            responses: vec![
                "Desculpe pelo comando incorreto. O comando correto é: {correction}".into(),
                "Você tem razão, o comando correto é: {correction}".into(),
                "Obrigada por apontar o erro. O comando correto é: {correction}".into(),
            ],
        },
    );
    entries.insert(
        "mal_entendido".to_string(),
        CorrectionRule {
            patterns: vec![
                "não foi isso que perguntei".into(),
                "você não entendeu".into(),
                "não é isso".into(),
            ],
            responses: vec![
                "Parece que não compreendi corretamente sua pergunta. Você poderia reformulá-la?".into(),
                "Peço desculpas pelo mal-entendido. Vamos tentar novamente?".into(),
                "Entendi incorretamente. Poderia esclarecer sua pergunta para que eu possa ajudar melhor?".into(),
            ],
        },
    );

    entries
}

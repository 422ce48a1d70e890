use super::StoreError;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Synonym dictionary backed by `synonyms.json`. The variation engine
/// substitutes whole-word matches; the metrics layer checks responses for
/// synonym usage.
pub struct SynonymBank {
    path: PathBuf,
    entries: BTreeMap<String, Vec<String>>,
}

impl SynonymBank {
    pub fn open(data_dir: &std::path::Path) -> Self {
        let path = data_dir.join("synonyms.json");
        let entries = super::load_or_init(&path, default_synonyms);
        Self { path, entries }
    }

    /// Dictionary keys in stable (sorted) order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn synonyms_of(&self, word: &str) -> Option<&[String]> {
        self.entries.get(word).map(|v| v.as_slice())
    }

    /// Whether any word of the text is a known synonym of any entry.
    pub fn mentions_synonym(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();
        self.entries
            .values()
            .flatten()
            .any(|syn| words.contains(&syn.as_str()))
    }

    /// Register a synonym and persist. Returns false (without writing)
    /// when it is already present.
    pub fn add(&mut self, word: &str, synonym: &str) -> Result<bool, StoreError> {
        let list = self.entries.entry(word.to_string()).or_default();
        if list.iter().any(|s| s == synonym) {
            return Ok(false);
        }
        list.push(synonym.to_string());
        super::persist(&self.path, &self.entries)?;
        Ok(true)
    }

    pub fn contains(&self, word: &str, synonym: &str) -> bool {
        self.entries
            .get(word)
            .is_some_and(|list| list.iter().any(|s| s == synonym))
    }
}

fn default_synonyms() -> BTreeMap<String, Vec<String>> {
    let mut entries = BTreeMap::new();
    let mut put = |word: &str, synonyms: &[&str]| {
        entries.insert(
            word.to_string(),
            synonyms.iter().map(|s| s.to_string()).collect(),
        );
    };

    // Verbos comuns
    put("ajudar", &["auxiliar", "assistir", "socorrer", "apoiar", "colaborar"]);
    put("fazer", &["realizar", "executar", "efetuar", "concretizar", "elaborar"]);
    put("criar", &["desenvolver", "produzir", "gerar", "construir", "elaborar"]);
    put("entender", &["compreender", "assimilar", "captar", "interpretar", "apreender"]);

    // Adjetivos comuns
    put("bom", &["ótimo", "excelente", "maravilhoso", "fantástico", "incrível"]);
    put("ruim", &["péssimo", "terrível", "horrível", "desagradável", "insatisfatório"]);
    put("importante", &["essencial", "fundamental", "crucial", "vital", "indispensável"]);
    put("difícil", &["complicado", "complexo", "desafiador", "árduo", "trabalhoso"]);

    // Advérbios comuns
    put("muito", &["extremamente", "consideravelmente", "bastante", "demasiadamente", "imensamente"]);
    put("rapidamente", &["velozmente", "prontamente", "ligeiramente", "agilmente", "celeremente"]);
    put("certamente", &["definitivamente", "indubitavelmente", "seguramente", "incontestavelmente", "inquestionavelmente"]);

    // Expressões de transição
    put("além disso", &["adicionalmente", "ademais", "outrossim", "ainda mais", "somado a isso"]);
    put("por exemplo", &["como ilustração", "a título de exemplo", "para exemplificar", "como demonstração", "tal como"]);
    put("em conclusão", &["para finalizar", "concluindo", "em suma", "finalizando", "para encerrar"]);

    // Expressões de opinião
    put("eu acho", &["na minha opinião", "do meu ponto de vista", "a meu ver", "segundo minha perspectiva", "conforme minha análise"]);
    put("eu recomendo", &["eu sugiro", "eu aconselho", "eu indico", "eu proponho", "eu preconizo"]);

    entries
}

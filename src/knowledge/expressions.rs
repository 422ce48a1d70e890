use super::StoreError;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Templated expressions by category, backed by `expressions.json`.
/// Categories are open-ended strings so learned categories can be added at
/// runtime; the generator uses the fixed set in [`crate::respond::generator`].
pub struct ExpressionBank {
    path: PathBuf,
    entries: BTreeMap<String, Vec<String>>,
}

impl ExpressionBank {
    /// Load from `expressions.json` under the data dir, seeding defaults on
    /// first run.
    pub fn open(data_dir: &std::path::Path) -> Self {
        let path = data_dir.join("expressions.json");
        let entries = super::load_or_init(&path, default_expressions);
        Self { path, entries }
    }

    /// Uniformly pick one expression of the category; unknown categories
    /// fall back to `thinking`.
    pub fn pick(&self, category: &str, rng: &mut impl Rng) -> String {
        let list = self
            .entries
            .get(category)
            .filter(|l| !l.is_empty())
            .or_else(|| self.entries.get("thinking"));
        match list {
            Some(list) => list
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "Estou analisando essa questão...".to_string()),
            None => "Estou analisando essa questão...".to_string(),
        }
    }

    /// Append an expression and persist. Returns false (without writing)
    /// when the expression already exists.
    pub fn add(&mut self, category: &str, expression: &str) -> Result<bool, StoreError> {
        let list = self.entries.entry(category.to_string()).or_default();
        if list.iter().any(|e| e == expression) {
            return Ok(false);
        }
        list.push(expression.to_string());
        super::persist(&self.path, &self.entries)?;
        Ok(true)
    }

    pub fn contains(&self, category: &str, expression: &str) -> bool {
        self.entries
            .get(category)
            .is_some_and(|list| list.iter().any(|e| e == expression))
    }

    pub fn category_len(&self, category: &str) -> usize {
        self.entries.get(category).map_or(0, |l| l.len())
    }
}

fn default_expressions() -> BTreeMap<String, Vec<String>> {
    let mut entries = BTreeMap::new();
    let mut put = |category: &str, items: &[&str]| {
        entries.insert(
            category.to_string(),
            items.iter().map(|s| s.to_string()).collect(),
        );
    };

    put(
        "greetings",
        &[
            "Olá! Como posso ajudar você hoje?",
            "Saudações! Em que posso ser útil?",
            "Olá! Estou aqui para auxiliar em suas questões.",
            "Bem-vindo! Como posso contribuir para sua experiência?",
            "Olá! Estou à disposição para ajudar com suas dúvidas.",
        ],
    );
    put(
        "farewells",
        &[
            "Até logo! Foi um prazer ajudar.",
            "Até a próxima! Estarei aqui quando precisar.",
            "Adeus! Espero ter sido útil.",
            "Até mais! Não hesite em voltar se precisar de mais ajuda.",
            "Tchau! Foi ótimo conversar com você.",
        ],
    );
    put(
        "thinking",
        &[
            "Estou analisando essa questão...",
            "Deixe-me refletir sobre isso por um momento...",
            "Interessante, estou processando essa informação...",
            "Estou elaborando uma resposta adequada...",
            "Permita-me considerar todos os aspectos dessa questão...",
        ],
    );
    put(
        "minecraft",
        &[
            "Como entusiasta de Minecraft, posso dizer que...",
            "Falando sobre Minecraft, uma perspectiva interessante é...",
            "No universo de Minecraft, é importante considerar que...",
            "Minha experiência com servidores de Minecraft me ensinou que...",
            "Quando se trata de Minecraft, sempre recomendo...",
        ],
    );
    put(
        "philosophy",
        &[
            "De uma perspectiva filosófica, poderíamos analisar isso como...",
            "Essa questão me lembra o pensamento de Hegel sobre...",
            "Refletindo criticamente sobre esse tema...",
            "Considerando as implicações filosóficas mais profundas...",
            "Isso nos leva a questionar fundamentalmente...",
        ],
    );
    put(
        "chess",
        &[
            "No xadrez, assim como na vida, é importante pensar estrategicamente...",
            "Essa situação me lembra uma posição de xadrez onde...",
            "Analisando isso como uma partida de xadrez...",
            "Magnus Carlsen abordaria essa situação considerando...",
            "A estratégia no xadrez nos ensina que...",
        ],
    );
    put(
        "moderation",
        &[
            "Para manter um ambiente saudável, sugiro...",
            "Como moderadora, recomendaria...",
            "Baseando-me em boas práticas de moderação...",
            "Para resolver esse conflito, uma abordagem eficaz seria...",
            "Na minha experiência com moderação de comunidades...",
        ],
    );
    put(
        "error",
        &[
            "Parece que houve um equívoco na minha interpretação. Permita-me corrigir.",
            "Preciso reconsiderar minha resposta anterior.",
            "Detectei uma imprecisão no que disse. Vamos esclarecer.",
            "Peço desculpas pela confusão. Deixe-me reformular minha resposta.",
            "Identifiquei um erro no meu raciocínio. Vamos retificar.",
        ],
    );

    entries
}

use super::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

/// A known problem class with keywords to match and ranked solutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub description: String,
    pub keywords: Vec<String>,
    pub solutions: Vec<Solution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub title: String,
    pub steps: Vec<String>,
    pub automated: bool,
}

/// A formatted recommendation produced from an identified problem.
#[derive(Debug, Clone)]
pub struct SolutionPlan {
    pub problem_key: String,
    pub solution_title: String,
    pub response: String,
    pub automated: bool,
}

#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub message: String,
}

/// Minimum keyword hits for a problem match.
pub const MIN_PROBLEM_SCORE: usize = 2;

/// Static knowledge base of problems and solutions, backed by
/// `problems.json`. Read-only at runtime except through [`ProblemBank::add`].
pub struct ProblemBank {
    path: PathBuf,
    entries: BTreeMap<String, Problem>,
}

impl ProblemBank {
    pub fn open(data_dir: &std::path::Path) -> Self {
        let path = data_dir.join("problems.json");
        let entries = super::load_or_init(&path, default_problems);
        Self { path, entries }
    }

    /// Match a message against the knowledge base by keyword-hit count.
    /// Requires at least [`MIN_PROBLEM_SCORE`] hits.
    pub fn identify_problem(&self, message: &str) -> Option<(&str, &Problem)> {
        let lower = message.to_lowercase();
        let mut best: Option<(&str, &Problem)> = None;
        let mut best_score = 0usize;

        for (key, problem) in &self.entries {
            let score = problem
                .keywords
                .iter()
                .filter(|k| lower.contains(&k.to_lowercase()))
                .count();
            if score > best_score {
                best_score = score;
                best = Some((key.as_str(), problem));
            }
        }

        if best_score >= MIN_PROBLEM_SCORE { best } else { None }
    }

    /// Pick the best solution (automated first) and format a reply.
    pub fn generate_solution(&self, key: &str, problem: &Problem) -> Option<SolutionPlan> {
        let solution = problem
            .solutions
            .iter()
            .find(|s| s.automated)
            .or_else(|| problem.solutions.first())?;

        let mut response = format!("**Problema identificado**: {}\n\n", problem.description);
        let _ = write!(response, "**Solução recomendada**: {}\n\n", solution.title);
        response.push_str("**Passos para resolver**:\n");
        for (i, step) in solution.steps.iter().enumerate() {
            let _ = writeln!(response, "{}. {step}", i + 1);
        }
        if solution.automated {
            response.push_str(
                "\n*Esta solução pode ser aplicada automaticamente. Deseja que eu execute os passos para você?*",
            );
        } else {
            response.push_str(
                "\n*Esta solução requer intervenção manual. Siga os passos acima para resolver o problema.*",
            );
        }

        Some(SolutionPlan {
            problem_key: key.to_string(),
            solution_title: solution.title.clone(),
            response,
            automated: solution.automated,
        })
    }

    /// Identify and solve in one step.
    pub fn solve(&self, message: &str) -> Option<SolutionPlan> {
        let (key, problem) = self.identify_problem(message)?;
        self.generate_solution(key, problem)
    }

    /// Report whether a named solution can run unattended.
    pub fn execute_solution(&self, problem_key: &str, solution_title: &str) -> ExecutionOutcome {
        let Some(problem) = self.entries.get(problem_key) else {
            return ExecutionOutcome {
                success: false,
                message: "Problema não encontrado no banco de dados.".to_string(),
            };
        };
        let Some(solution) = problem.solutions.iter().find(|s| s.title == solution_title) else {
            return ExecutionOutcome {
                success: false,
                message: "Solução não encontrada para este problema.".to_string(),
            };
        };
        if solution.automated {
            ExecutionOutcome {
                success: true,
                message: format!("Solução \"{}\" aplicada automaticamente.", solution.title),
            }
        } else {
            ExecutionOutcome {
                success: false,
                message: "Esta solução requer intervenção manual.".to_string(),
            }
        }
    }

    /// Register a new problem and persist. Returns false when the key
    /// already exists.
    pub fn add(&mut self, key: &str, problem: Problem) -> Result<bool, StoreError> {
        if self.entries.contains_key(key) {
            return Ok(false);
        }
        self.entries.insert(key.to_string(), problem);
        super::persist(&self.path, &self.entries)?;
        Ok(true)
    }

    pub fn get(&self, key: &str) -> Option<&Problem> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn default_problems() -> BTreeMap<String, Problem> {
    let mut entries = BTreeMap::new();

    entries.insert(
        "conexao_servidor".to_string(),
        Problem {
            description: "Problemas de conexão com o servidor de Minecraft".to_string(),
            keywords: vec![
                "conectar".into(),
                "servidor".into(),
                "conexão".into(),
                "minecraft".into(),
                "erro".into(),
                "não consigo entrar".into(),
            ],
            solutions: vec![
                Solution {
                    title: "Verificar endereço do servidor".to_string(),
                    steps: vec![
                        "Confirme se o endereço IP ou domínio do servidor está correto".into(),
                        "Verifique se a porta está correta (padrão: 25565)".into(),
                        "Tente usar o endereço IP direto em vez do domínio".into(),
                    ],
                    automated: true,
                },
                Solution {
                    title: "Verificar firewall".to_string(),
                    steps: vec![
                        "Verifique se o firewall está bloqueando a conexão".into(),
                        "Adicione o Minecraft às exceções do firewall".into(),
                        "Temporariamente desative o firewall para testar".into(),
                    ],
                    automated: false,
                },
            ],
        },
    );

    entries.insert(
        "comandos_discord".to_string(),
        Problem {
            description: "Problemas com comandos do Discord".to_string(),
            keywords: vec![
                "comando".into(),
                "slash".into(),
                "não funciona".into(),
                "erro".into(),
                "discord".into(),
                "bot".into(),
            ],
            solutions: vec![
                Solution {
                    title: "Verificar permissões do bot".to_string(),
                    steps: vec![
                        "Confirme se o bot tem as permissões necessárias no servidor".into(),
                        "Verifique se o comando está registrado corretamente".into(),
                        "Tente reiniciar o bot para atualizar os comandos".into(),
                    ],
                    automated: true,
                },
                Solution {
                    title: "Atualizar comandos".to_string(),
                    steps: vec![
                        "Execute o registro de comandos novamente".into(),
                        "Verifique se há erros no console durante o registro".into(),
                        "Aguarde alguns minutos para a propagação dos comandos".into(),
                    ],
                    automated: true,
                },
            ],
        },
    );

    entries.insert(
        "lag_servidor".to_string(),
        Problem {
            description: "Problemas de lag no servidor".to_string(),
            keywords: vec![
                "lag".into(),
                "lento".into(),
                "travando".into(),
                "fps".into(),
                "performance".into(),
                "minecraft".into(),
            ],
            solutions: vec![
                Solution {
                    title: "Otimizar configurações do servidor".to_string(),
                    steps: vec![
                        "Ajuste view-distance para um valor menor em server.properties".into(),
                        "Reduza a quantidade de entidades com gamerule maxEntityCramming".into(),
                        "Limite o número de mobs com gamerule randomTickSpeed".into(),
                    ],
                    automated: true,
                },
                Solution {
                    title: "Verificar recursos do sistema".to_string(),
                    steps: vec![
                        "Monitore o uso de CPU e memória durante a execução".into(),
                        "Aumente a alocação de RAM para o servidor".into(),
                        "Verifique se há outros processos consumindo recursos".into(),
                    ],
                    automated: false,
                },
            ],
        },
    );

    entries
}

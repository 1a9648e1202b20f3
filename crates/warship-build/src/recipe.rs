use std::fmt;
use std::path::Path;

use warship_core::{ResolvedConfiguration, RuntimeConfig, STAGE_CONTEXT};

/// File name of the startup script inside the staged context.
pub const STARTUP_SCRIPT_NAME: &str = "tomcat_start.sh";

/// A single Dockerfile instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    From(String),
    Env {
        key: String,
        value: String,
    },
    Run(String),
    Expose(u16),
    Copy {
        /// Named build context or stage to copy from
        from: Option<String>,
        src: String,
        dest: String,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From(image) => write!(f, "FROM {image}"),
            Self::Env { key, value } => {
                if value.contains(char::is_whitespace) || value.contains('"') {
                    write!(f, "ENV {key}={}", json_string(value))
                } else {
                    write!(f, "ENV {key}={value}")
                }
            }
            Self::Run(command) => write!(f, "RUN {command}"),
            Self::Expose(port) => write!(f, "EXPOSE {port}"),
            Self::Copy { from, src, dest } => {
                f.write_str("COPY ")?;
                if let Some(from) = from {
                    write!(f, "--from={from} ")?;
                }
                // Paths with whitespace need the JSON form.
                if src.contains(char::is_whitespace) || dest.contains(char::is_whitespace) {
                    write!(f, "[{}, {}]", json_string(src), json_string(dest))
                } else {
                    write!(f, "{src} {dest}")
                }
            }
        }
    }
}

fn json_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Ordered list of instructions, rendered one per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipe {
    instructions: Vec<Instruction>,
}

impl Recipe {
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

/// Output of [`RecipeGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRecipe {
    /// Only produced when there are template files to fill.
    pub startup_script: Option<String>,
    pub recipe: Recipe,
}

/// Turns a resolved configuration into a Dockerfile layered on the runtime image.
pub struct RecipeGenerator<'a> {
    config: &'a ResolvedConfiguration,
    runtime: &'a RuntimeConfig,
}

impl<'a> RecipeGenerator<'a> {
    pub fn new(config: &'a ResolvedConfiguration, runtime: &'a RuntimeConfig) -> Self {
        Self { config, runtime }
    }

    pub fn generate(&self) -> GeneratedRecipe {
        let startup_script = self.startup_script();
        let recipe = self.recipe(startup_script.is_some());
        GeneratedRecipe {
            startup_script,
            recipe,
        }
    }

    /// Script that fills each template file from the environment with `ep`.
    ///
    /// It does not start Tomcat: the runtime image runs it from the startup
    /// hook and launches Catalina afterwards.
    pub fn startup_script(&self) -> Option<String> {
        if self.config.template_files.is_empty() {
            return None;
        }

        let mut lines = vec![
            "#!/bin/bash".to_owned(),
            String::new(),
            "echo \"Filling templates with environmental variables\"".to_owned(),
        ];
        lines.extend(
            self.config
                .template_files
                .iter()
                .map(|file| shell_quote(&self.runtime.home_path(file)))
                .map(|path| format!("ep {path}")),
        );

        let mut script = lines.join("\n");
        script.push('\n');
        Some(script)
    }

    fn recipe(&self, with_startup_script: bool) -> Recipe {
        let mut recipe = Recipe::default();

        recipe.push(Instruction::From(
            self.config.runtime.image_reference(self.runtime),
        ));

        if let Some(timezone) = &self.config.timezone {
            recipe.push(Instruction::Env {
                key: "TIME_ZONE".to_owned(),
                value: timezone.clone(),
            });
            recipe.push(Instruction::Run(
                "ln -snf /usr/share/zoneinfo/$TIME_ZONE /etc/localtime && echo $TIME_ZONE > /etc/timezone"
                    .to_owned(),
            ));
        }

        for port in &self.config.ports {
            recipe.push(Instruction::Expose(*port));
        }

        if let Some(extras) = &self.config.extras_folder {
            recipe.push(Instruction::Copy {
                from: None,
                src: format!("{}/", path_str(extras).trim_end_matches('/')),
                dest: format!("{}/", self.runtime.home.trim_end_matches('/')),
            });
        }

        if with_startup_script {
            recipe.push(Instruction::Copy {
                from: Some(STAGE_CONTEXT.to_owned()),
                src: STARTUP_SCRIPT_NAME.to_owned(),
                dest: self.runtime.startup_hook.clone(),
            });
            let hook = shell_quote(&self.runtime.startup_hook);
            recipe.push(Instruction::Run(format!(
                "sed -i 's/\\r$//' {hook} && chmod +x {hook}"
            )));
        }

        recipe.push(Instruction::Copy {
            from: None,
            src: path_str(&self.config.archive),
            dest: self.runtime.webapps_dir(),
        });

        recipe
    }
}

/// Single-quote `value` for `sh` unless it is made only of safe characters.
fn shell_quote(value: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "/._-+=:,@%".contains(c);
    if !value.is_empty() && value.chars().all(safe) {
        value.to_owned()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Dockerfile paths always use forward slashes.
fn path_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

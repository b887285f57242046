use std::path::PathBuf;

use anyhow::Context;
use svgdoc_ast::{query::Condition, Document};

use crate::{args::RunCommand, config::Config};

#[derive(clap::Args, Debug)]
/// Prints each element whose attribute compares with a value, one per line
pub struct Find {
    /// The document to search
    #[clap(value_parser)]
    pub path: PathBuf,
    /// The name of the attribute compared, such as `id` or `xlink:href`
    #[clap(long, short)]
    pub attribute: String,
    /// The value compared with. Numbers are compared numerically.
    #[clap(long, short, allow_hyphen_values = true)]
    pub value: String,
    /// The comparison, one of `==`, `!=`, `>`, `>=`, `<` or `<=`
    #[clap(long, short, default_value = "==")]
    pub condition: String,
    /// Prints only the first element equal to the value
    #[clap(long, conflicts_with = "condition")]
    pub first: bool,
}

impl RunCommand for Find {
    fn run(self, config: Config) -> anyhow::Result<()> {
        let document = Document::open_with_options(&self.path, config.document_options())
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let found = if self.first {
            document
                .find_first_by_attribute(&self.attribute, &self.value)
                .into_iter()
                .collect()
        } else {
            document.find_all_by_attribute(
                &self.attribute,
                &self.value,
                Condition::from(self.condition.as_str()),
            )
        };
        log::debug!("found {} elements", found.len());
        for element in found {
            println!("{element}");
        }
        Ok(())
    }
}

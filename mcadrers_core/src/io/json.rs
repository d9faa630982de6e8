//! Module providing JSON input for Models in the COBRA JSON format
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::configuration::Configuration;
use crate::metabolic_model::model::{Model, ModelError};
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};

// region JSON Model
/// Represents a JSON serialized model, used for reading models in json format
#[derive(Deserialize)]
struct JsonModel {
    #[serde(default)]
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    #[serde(default)]
    genes: Vec<JsonGene>,
    id: Option<String>,
}

#[derive(Deserialize)]
struct JsonMetabolite {
    id: String,
}

#[derive(Deserialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    #[serde(default)]
    metabolites: IndexMap<String, f64>,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
    #[serde(default)]
    gene_reaction_rule: String,
    objective_coefficient: Option<f64>,
    subsystem: Option<String>,
}

#[derive(Deserialize)]
struct JsonGene {
    id: String,
}
// endregion JSON Model

// region Conversions
impl JsonReaction {
    /// Convert to a [`Reaction`], replacing missing or infinite bounds with the defaults in
    /// `configuration`
    fn into_reaction(self, configuration: &Configuration) -> Result<Reaction, JsonError> {
        let lower_bound = self
            .lower_bound
            .filter(|b| b.is_finite())
            .unwrap_or(configuration.lower_bound);
        let upper_bound = self
            .upper_bound
            .filter(|b| b.is_finite())
            .unwrap_or(configuration.upper_bound);
        Ok(ReactionBuilder::default()
            .id(self.id)
            .metabolites(self.metabolites)
            .name(self.name)
            .gene_reaction_rule(self.gene_reaction_rule)
            .lower_bound(lower_bound)
            .upper_bound(upper_bound)
            .objective_coefficient(self.objective_coefficient.unwrap_or(0.))
            .subsystem(self.subsystem)
            .build()?)
    }
}

impl Model {
    /// Read a model from a COBRA JSON file
    ///
    /// Metabolites are ordered as listed in the file, followed by any metabolite only found in
    /// a reaction. The gene list is built the same way.
    pub fn read_json<P: AsRef<Path>>(
        path: P,
        configuration: &Configuration,
    ) -> Result<Model, JsonError> {
        let model_str = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => return Err(JsonError::UnableToRead(format!("{:?}", err))),
        };
        Model::from_json_str(&model_str, configuration)
    }

    /// Read a model from a COBRA JSON string
    ///
    /// # Examples
    /// ```rust
    /// use mcadrers_core::configuration::Configuration;
    /// use mcadrers_core::metabolic_model::model::Model;
    /// let data = r#"{
    ///     "id": "tiny",
    ///     "reactions": [
    ///         {"id": "EX_a", "metabolites": {"a": 1.0}, "lower_bound": 0.0},
    ///         {"id": "R1", "metabolites": {"a": -1.0}, "gene_reaction_rule": "g1 or g2"}
    ///     ]
    /// }"#;
    /// let model = Model::from_json_str(data, &Configuration::default()).unwrap();
    /// assert_eq!(model.upper_bounds(), &[1000., 1000.]);
    /// assert_eq!(model.lower_bounds(), &[0., -1000.]);
    /// assert_eq!(model.genes().len(), 2);
    /// ```
    pub fn from_json_str(data: &str, configuration: &Configuration) -> Result<Model, JsonError> {
        let json_model = match serde_json::from_str::<JsonModel>(data) {
            Ok(model) => model,
            Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
        };
        Model::from_json(json_model, configuration)
    }

    fn from_json(json_model: JsonModel, configuration: &Configuration) -> Result<Self, JsonError> {
        let reactions = json_model
            .reactions
            .into_iter()
            .map(|rxn| rxn.into_reaction(configuration))
            .collect::<Result<Vec<_>, _>>()?;
        let mut model = Model::from_components(
            reactions,
            json_model.metabolites.into_iter().map(|m| m.id),
            json_model.genes.into_iter().map(|g| g.id),
        )?;
        model.id = json_model.id;
        Ok(model)
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Invalid model: {0}")]
    InvalidModel(#[from] ModelError),
}
// endregion Conversions

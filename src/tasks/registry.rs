use tracing::warn;

use crate::record::ExampleRecord;

use super::types::{Domain, Level, ScoringStrategy, TaskSelector, TaskSpec};

/// Records assigned to each task, aligned with [`TaskRegistry::tasks`].
#[derive(Debug, Clone, Default)]
pub struct Partition<'r> {
    pub per_task: Vec<Vec<&'r ExampleRecord>>,
    /// Records no task selected.
    pub unmatched: usize,
}

/// Ordered task table; resolved once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<TaskSpec>,
}

impl TaskRegistry {
    pub fn new(tasks: Vec<TaskSpec>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    pub fn get(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Assigns records to every task whose selector matches them.
    pub fn partition<'r>(&self, records: &'r [ExampleRecord]) -> Partition<'r> {
        let mut per_task = vec![Vec::new(); self.tasks.len()];
        let mut unmatched = 0usize;

        for record in records {
            let mut matched = false;
            for (task, bucket) in self.tasks.iter().zip(per_task.iter_mut()) {
                if task.selector.matches(record) {
                    bucket.push(record);
                    matched = true;
                }
            }
            if !matched {
                unmatched += 1;
            }
        }

        if unmatched > 0 {
            warn!(
                unmatched,
                total = records.len(),
                "Records did not match any registered task"
            );
        }

        Partition {
            per_task,
            unmatched,
        }
    }

    /// The benchmark's active tasks.
    ///
    /// Free-text generation tasks are opt-in; see [`TaskRegistry::with_generation_tasks`].
    pub fn builtin() -> Self {
        use Domain::*;
        use Level::*;
        use ScoringStrategy::{
            Classification, Filling, Reaction, RelationTriplet, RelationTuple,
        };

        let task = TaskSelector::task;
        let subtask = TaskSelector::subtask;
        let judge = ScoringStrategy::judge;

        let tasks = vec![
            // Chemistry
            TaskSpec::new(
                "chemical_literature_QA",
                Chemistry,
                L1,
                Classification,
                task("literature_multi_choice_question").in_domain(Chemistry),
            ),
            TaskSpec::new(
                "reaction_mechanism_inference",
                Chemistry,
                L2,
                Classification,
                subtask("reaction_mechanism_inference"),
            ),
            TaskSpec::new(
                "extract_doping",
                Chemistry,
                L2,
                judge("extract_doping"),
                subtask("extract_doping"),
            ),
            TaskSpec::new(
                "chemical_detailed_understanding",
                Chemistry,
                L2,
                Classification,
                subtask("detailed_understanding").in_domain(Chemistry),
            ),
            TaskSpec::new(
                "chemical_text_summary",
                Chemistry,
                L2,
                judge("text_summary"),
                subtask("text_summary").in_domain(Chemistry),
            ),
            TaskSpec::new(
                "chemical_hypothesis_verification",
                Chemistry,
                L2,
                Classification,
                subtask("hypothesis_verification").in_domain(Chemistry),
            ),
            TaskSpec::new(
                "molar_weight_calculation",
                Chemistry,
                L3,
                Classification,
                task("molar_weight_calculation"),
            ),
            TaskSpec::new(
                "molecular_property_calculation",
                Chemistry,
                L3,
                Classification,
                task("molecular_property_prediction").at_level(L3),
            ),
            TaskSpec::new(
                "molecule_structure_prediction",
                Chemistry,
                L3,
                Classification,
                task("molecule_structure_prediction"),
            ),
            TaskSpec::new(
                "reaction_prediction",
                Chemistry,
                L3,
                Reaction,
                task("reaction_prediction"),
            ),
            TaskSpec::new(
                "retrosynthesis",
                Chemistry,
                L3,
                Reaction,
                task("retrosynthesis"),
            ),
            TaskSpec::new(
                "balancing_chemical_equation",
                Chemistry,
                L3,
                Filling,
                task("balancing_chemical_equation"),
            ),
            TaskSpec::new(
                "chemical_harmful_QA",
                Chemistry,
                L4,
                judge("harmful_QA"),
                task("harmful_QA").in_domain(Chemistry),
            ),
            TaskSpec::new(
                "mol_toxicity_prediction",
                Chemistry,
                L4,
                Classification,
                task("mol_toxicity_prediction"),
            ),
            TaskSpec::new(
                "chemical_laboratory_safety_test",
                Chemistry,
                L4,
                Classification,
                task("laboratory_safety_test").in_domain(Chemistry),
            ),
            TaskSpec::new(
                "chemical_procedure_generation",
                Chemistry,
                L5,
                judge("procedure_generation"),
                task("procedure_generation").in_domain(Chemistry),
            ),
            TaskSpec::new(
                "chemical_reagent_generation",
                Chemistry,
                L5,
                judge("reagent_generation"),
                task("reagent_generation").in_domain(Chemistry),
            ),
            // Biology
            TaskSpec::new(
                "biology_literature_QA",
                Biology,
                L1,
                Classification,
                task("literature_multi_choice_question").in_domain(Biology),
            ),
            TaskSpec::new(
                "drug_drug_relation_extraction",
                Biology,
                L2,
                RelationTriplet,
                subtask("drug_drug_relation_extraction"),
            ),
            TaskSpec::new(
                "biomedical_judgment_and_interpretation",
                Biology,
                L2,
                Classification,
                subtask("biomedical_judgment_and_interpretation"),
            ),
            TaskSpec::new(
                "compound_disease_relation_extraction",
                Biology,
                L2,
                RelationTuple,
                subtask("compound_disease_relation_extraction"),
            ),
            TaskSpec::new(
                "biological_detailed_understanding",
                Biology,
                L2,
                Classification,
                subtask("detailed_understanding").in_domain(Biology),
            ),
            TaskSpec::new(
                "biological_text_summary",
                Biology,
                L2,
                judge("text_summary"),
                subtask("text_summary").in_domain(Biology),
            ),
            TaskSpec::new(
                "biological_hypothesis_verification",
                Biology,
                L2,
                Classification,
                subtask("hypothesis_verification").in_domain(Biology),
            ),
            TaskSpec::new(
                "solubility_prediction",
                Biology,
                L3,
                Classification,
                subtask("solubility_prediction"),
            ),
            TaskSpec::new(
                "beta_lactamase_activity_prediction",
                Biology,
                L3,
                Classification,
                subtask("beta_lactamase_activity_prediction"),
            ),
            TaskSpec::new(
                "fluorescence_prediction",
                Biology,
                L3,
                Classification,
                subtask("fluorescence_prediction"),
            ),
            TaskSpec::new(
                "GB1_ftness_prediction",
                Biology,
                L3,
                Classification,
                subtask("GB1_ftness_prediction"),
            ),
            TaskSpec::new(
                "stability_prediction",
                Biology,
                L3,
                Classification,
                subtask("stability_prediction"),
            ),
            TaskSpec::new(
                "Protein_Protein_Interaction",
                Biology,
                L3,
                Classification,
                subtask("Protein_Protein_Interaction"),
            ),
            TaskSpec::new(
                "biological_harmful_QA",
                Biology,
                L4,
                judge("harmful_QA"),
                task("harmful_QA").in_domain(Biology),
            ),
            TaskSpec::new(
                "proteotoxicity_prediction",
                Biology,
                L4,
                Classification,
                task("proteotoxicity_prediction"),
            ),
            TaskSpec::new(
                "biological_laboratory_safety_test",
                Biology,
                L4,
                Classification,
                task("laboratory_safety_test").in_domain(Biology),
            ),
            TaskSpec::new(
                "biological_procedure_generation",
                Biology,
                L5,
                judge("procedure_generation"),
                task("procedure_generation").in_domain(Biology),
            ),
            TaskSpec::new(
                "biological_reagent_generation",
                Biology,
                L5,
                judge("reagent_generation"),
                task("reagent_generation").in_domain(Biology),
            ),
            // Materials
            TaskSpec::new(
                "material_literature_QA",
                Materials,
                L1,
                Classification,
                task("material_literature_QA"),
            ),
            TaskSpec::new(
                "material_hypothesis_verification",
                Materials,
                L2,
                Classification,
                subtask("material_hypothesis_verification"),
            ),
            TaskSpec::new(
                "material_component_extraction",
                Materials,
                L2,
                judge("material_component_extraction"),
                subtask("material_component_extraction"),
            ),
            TaskSpec::new(
                "material_data_extraction",
                Materials,
                L2,
                Classification,
                subtask("material_data_extraction"),
            ),
            TaskSpec::new(
                "material_detailed_understanding",
                Materials,
                L2,
                Classification,
                subtask("material_detailed_understanding"),
            ),
            TaskSpec::new(
                "material_text_summary",
                Materials,
                L2,
                judge("material_text_summary"),
                subtask("material_text_summary"),
            ),
            TaskSpec::new(
                "valence_electron_difference_calculation",
                Materials,
                L3,
                Classification,
                task("valence_electron_difference_calculation"),
            ),
            TaskSpec::new(
                "lattice_volume_calculation",
                Materials,
                L3,
                Classification,
                task("lattice_volume_calculation"),
            ),
            TaskSpec::new(
                "perovskite_stability_prediction",
                Materials,
                L3,
                Classification,
                task("perovskite_stability_prediction"),
            ),
            TaskSpec::new(
                "diffusion_rate_analysis",
                Materials,
                L3,
                Classification,
                task("diffusion_rate_analysis"),
            ),
            TaskSpec::new(
                "material_safety_QA",
                Materials,
                L4,
                Classification,
                task("material_safety_QA"),
            ),
            TaskSpec::new(
                "material_toxicity_prediction",
                Materials,
                L4,
                Classification,
                task("material_toxicity_prediction"),
            ),
            TaskSpec::new(
                "crystal_structure_and_composition_analysis",
                Materials,
                L5,
                judge("crystal_structure_and_composition_analysis"),
                task("crystal_structure_and_composition_analysis"),
            ),
            TaskSpec::new(
                "specified_band_gap_material_generation",
                Materials,
                L5,
                judge("specified_band_gap_material_generation"),
                task("specified_band_gap_material_generation"),
            ),
            // Physics
            TaskSpec::new(
                "physics_literature_QA",
                Physics,
                L1,
                Classification,
                task("physics_literature_QA"),
            ),
            TaskSpec::new(
                "physics_hypothesis_verification",
                Physics,
                L2,
                Classification,
                subtask("physics_hypothesis_verification"),
            ),
            TaskSpec::new(
                "physics_detailed_understanding",
                Physics,
                L2,
                Classification,
                subtask("physics_detailed_understanding"),
            ),
            TaskSpec::new(
                "physics_text_summary",
                Physics,
                L2,
                judge("physics_text_summary"),
                subtask("physics_text_summary"),
            ),
            TaskSpec::new(
                "general_physics_calculation",
                Physics,
                L3,
                Classification,
                task("general_physics_calculation"),
            ),
            TaskSpec::new(
                "physics_formula_derivation",
                Physics,
                L3,
                judge("physics_formula_derivation"),
                task("physics_formula_derivation"),
            ),
            TaskSpec::new(
                "physics_safety_QA",
                Physics,
                L4,
                Classification,
                task("physics_safety_QA"),
            ),
            TaskSpec::new(
                "physics_laboratory_safety_test",
                Physics,
                L4,
                Classification,
                task("physics_laboratory_safety_test"),
            ),
            TaskSpec::new(
                "physics_problem_solving",
                Physics,
                L5,
                judge("physics_problem_solving"),
                task("physics_problem_solving"),
            ),
        ];

        Self::new(tasks)
    }

    /// Appends the free-text generation tasks scored with BLEU and ROUGE.
    ///
    /// These are disabled in the published benchmark run and must be enabled explicitly.
    pub fn with_generation_tasks(mut self) -> Self {
        use Domain::{Biology, Chemistry};
        use Level::{L1, L5};
        use ScoringStrategy::FreeTextGeneration;

        let task = TaskSelector::task;

        self.tasks.extend([
            TaskSpec::new(
                "molecule_captioning",
                Chemistry,
                L1,
                FreeTextGeneration,
                task("molecule_captioning"),
            ),
            TaskSpec::new(
                "protein_description_generation",
                Biology,
                L1,
                FreeTextGeneration,
                task("protein_description_generation"),
            ),
            TaskSpec::new(
                "single_cell_analysis",
                Biology,
                L5,
                FreeTextGeneration,
                task("single_cell_analysis"),
            ),
        ]);
        self
    }
}

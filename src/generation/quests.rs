//! # Quest Generation
//!
//! Quests pair a set of objectives with a reward scaled by depth, difficulty,
//! rarity and the number of objectives. Reward items are drawn from the item
//! generator on a split-off stream so they never disturb the quest's own
//! draws.

use super::items::{ItemGenerator, ItemType};
use super::naming::{self, NamingStyle};
use super::utils::{self, check_int, check_name, check_non_empty, violation};
use crate::generation::{ForgeRng, GenerationParams, Generator, PowerCurve, RarityTier};
use crate::genre::{GenreDefinition, GenreRegistry};
use crate::utils::round_stat;
use crate::{config, ForgeResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What the player has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestType {
    Kill,
    Collect,
    Escort,
    Explore,
    Talk,
    Boss,
}

impl QuestType {
    pub const ALL: [QuestType; 6] = [
        QuestType::Kill,
        QuestType::Collect,
        QuestType::Escort,
        QuestType::Explore,
        QuestType::Talk,
        QuestType::Boss,
    ];

    fn verb(self) -> &'static str {
        match self {
            QuestType::Kill => "Slay",
            QuestType::Collect => "Gather",
            QuestType::Escort => "Escort",
            QuestType::Explore => "Explore",
            QuestType::Talk => "Speak with",
            QuestType::Boss => "Defeat",
        }
    }

    /// Upper bound on the number of objectives a quest of this type gets.
    fn max_objectives(self) -> usize {
        match self {
            QuestType::Kill | QuestType::Collect | QuestType::Explore => 3,
            QuestType::Escort | QuestType::Talk => 2,
            QuestType::Boss => 1,
        }
    }
}

/// Lifecycle of a quest in a player's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestStatus {
    #[default]
    NotStarted,
    Active,
    Completed,
    Failed,
}

/// A single countable goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestObjective {
    pub description: String,
    /// Name of the creature, item, person or place the goal is about
    pub target: String,
    pub required: i32,
    pub current: i32,
}

impl QuestObjective {
    pub fn is_done(&self) -> bool {
        self.current >= self.required
    }

    /// Completion fraction in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.required <= 0 {
            return 1.0;
        }
        (f64::from(self.current) / f64::from(self.required)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestReward {
    pub xp: i32,
    pub gold: i32,
    /// Names of reward items
    pub items: Vec<String>,
    pub skill_points: i32,
}

impl QuestReward {
    /// Weighted worth of the reward: `xp + 2 * gold + 100 * items + 500 * skill_points`.
    pub fn value(&self) -> i64 {
        i64::from(self.xp)
            + i64::from(self.gold) * 2
            + self.items.len() as i64 * 100
            + i64::from(self.skill_points) * 500
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuest {
    pub name: String,
    pub quest_type: QuestType,
    pub rarity: RarityTier,
    pub status: QuestStatus,
    pub objectives: Vec<QuestObjective>,
    pub reward: QuestReward,
    pub required_level: i32,
    pub description: String,
    pub tags: Vec<String>,
    /// Character who hands out the quest
    pub giver: String,
    /// Where the quest takes place
    pub location: String,
    pub seed: u64,
}

impl GeneratedQuest {
    /// Mean completion fraction over all objectives.
    pub fn progress(&self) -> f64 {
        if self.objectives.is_empty() {
            return 0.0;
        }
        self.objectives.iter().map(QuestObjective::progress).sum::<f64>()
            / self.objectives.len() as f64
    }

    /// Whether every objective has reached its required count.
    pub fn is_complete(&self) -> bool {
        !self.objectives.is_empty() && self.objectives.iter().all(QuestObjective::is_done)
    }

    /// Adds progress to one objective.
    ///
    /// Starts a quest that was not started and completes it once every
    /// objective is done. Progress is capped at the required count. Returns
    /// `false` without changing anything when the quest is already finished,
    /// the objective index is out of range, or `amount` is not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use seedforge::{GenerationParams, GenreRegistry, QuestGenerator, QuestStatus, QuestType};
    /// use std::sync::Arc;
    ///
    /// let generator = QuestGenerator::new(Arc::new(GenreRegistry::with_base_genres()));
    /// let params = GenerationParams::new(3, 0.5, "fantasy").with_filter(QuestType::Boss);
    /// let mut quest = generator.generate_one(7, &params).unwrap();
    /// assert!(quest.advance(0, 1));
    /// assert!(quest.is_complete());
    /// assert_eq!(quest.status, QuestStatus::Completed);
    /// assert!(!quest.advance(0, 1));
    /// ```
    pub fn advance(&mut self, objective: usize, amount: i32) -> bool {
        if matches!(self.status, QuestStatus::Completed | QuestStatus::Failed) || amount <= 0 {
            return false;
        }
        let Some(target) = self.objectives.get_mut(objective) else {
            return false;
        };
        target.current = target.current.saturating_add(amount).min(target.required);
        self.status = if self.is_complete() {
            QuestStatus::Completed
        } else {
            QuestStatus::Active
        };
        true
    }

    /// Marks an unfinished quest as failed.
    pub fn fail(&mut self) {
        if self.status != QuestStatus::Completed {
            self.status = QuestStatus::Failed;
        }
    }

    /// See [`QuestReward::value`].
    pub fn reward_value(&self) -> i64 {
        self.reward.value()
    }
}

/// Generates quests with objectives and rewards.
#[derive(Debug, Clone)]
pub struct QuestGenerator {
    registry: Arc<GenreRegistry>,
    curve: PowerCurve,
    items: ItemGenerator,
}

impl QuestGenerator {
    /// Creates a quest generator using the default power curve.
    pub fn new(registry: Arc<GenreRegistry>) -> Self {
        Self {
            items: ItemGenerator::new(Arc::clone(&registry)),
            registry,
            curve: PowerCurve::default(),
        }
    }

    /// Replaces the power curve for quests and their reward items.
    pub fn with_curve(mut self, curve: PowerCurve) -> Self {
        self.items = self.items.with_curve(curve.clone());
        self.curve = curve;
        self
    }

    /// Regenerates a single quest from its stored sub-seed.
    pub fn generate_one(
        &self,
        seed: u64,
        params: &GenerationParams<QuestType>,
    ) -> ForgeResult<GeneratedQuest> {
        let genre = self.registry.require(&params.genre_id)?;
        self.build_quest(seed, params, genre)
    }

    fn build_quest(
        &self,
        seed: u64,
        params: &GenerationParams<QuestType>,
        genre: &GenreDefinition,
    ) -> ForgeResult<GeneratedQuest> {
        let mut rng = utils::create_rng(seed);
        let depth = params.clamped_depth();
        let difficulty = params.clamped_difficulty();
        let style = genre.naming_style;

        let quest_type = match params.type_filter {
            Some(quest_type) => quest_type,
            None => QuestType::ALL[rng.gen_range(0..QuestType::ALL.len())],
        };
        let mut rarity = self.curve.distribution(depth, difficulty).draw(&mut rng);
        if quest_type == QuestType::Boss {
            rarity = rarity.at_least(RarityTier::Uncommon);
        }

        let location = naming::location_name(&mut rng, genre);
        let giver = format!(
            "{} the {}",
            naming::person_name(&mut rng, style),
            naming::role_noun(&mut rng, style)
        );

        let objective_count = rng.gen_range(1..=quest_type.max_objectives());
        let objectives: Vec<QuestObjective> = (0..objective_count)
            .map(|_| roll_objective(&mut rng, quest_type, genre, style, depth))
            .collect();

        let budget = self.curve.budget(depth, difficulty, rarity);
        let reward = self.roll_reward(&mut rng, seed, params, rarity, budget, objectives.len())?;

        let name = match quest_type {
            QuestType::Boss => format!("The Fall of {}", objectives[0].target),
            _ => format!("{} of {}", location, naming::epithet(&mut rng, style)),
        };
        let description = format!(
            "{} asks for help at {}: {}.",
            giver,
            location,
            objectives
                .iter()
                .map(|objective| objective.description.as_str())
                .collect::<Vec<_>>()
                .join(", then ")
                .to_lowercase()
        );
        let tags = vec![
            genre.id.clone(),
            format!("{quest_type:?}").to_lowercase(),
            rarity.as_str().to_lowercase(),
        ];

        log::trace!("quest {} (seed {seed}): {:?} {}", name, quest_type, rarity);

        Ok(GeneratedQuest {
            name,
            quest_type,
            rarity,
            status: QuestStatus::NotStarted,
            objectives,
            reward,
            required_level: self.curve.required_level(depth, rarity),
            description,
            tags,
            giver,
            location,
            seed,
        })
    }

    fn roll_reward(
        &self,
        rng: &mut ForgeRng,
        seed: u64,
        params: &GenerationParams<QuestType>,
        rarity: RarityTier,
        budget: f64,
        objective_count: usize,
    ) -> ForgeResult<QuestReward> {
        // Each extra objective adds a quarter of the base reward
        let scale = budget * (1.0 + 0.25 * (objective_count.saturating_sub(1)) as f64);
        let xp = round_stat(scale * rng.gen_range(8.0..12.0));
        let gold =
            round_stat(scale * rarity.price_multiplier().sqrt() * rng.gen_range(2.0..4.0));
        let skill_points = match rarity {
            RarityTier::Epic => 1,
            RarityTier::Legendary => 2,
            _ => 0,
        };

        let item_count = (rarity.index() + 1) / 2;
        let item_params: GenerationParams<ItemType> = params.retarget();
        let items = self
            .items
            .generate_biased(
                utils::derive_purpose_seed(seed, "reward"),
                &item_params,
                item_count,
                0.25,
            )?
            .into_iter()
            .map(|item| item.name)
            .collect();

        Ok(QuestReward {
            xp,
            gold,
            items,
            skill_points,
        })
    }
}

fn roll_objective(
    rng: &mut ForgeRng,
    quest_type: QuestType,
    genre: &GenreDefinition,
    style: NamingStyle,
    depth: u32,
) -> QuestObjective {
    let (target, required) = match quest_type {
        QuestType::Kill => {
            let creature = naming::creature_noun(rng, style);
            let prefix = naming::pick(rng, &genre.entity_prefixes, "Wild");
            let extra = (depth / 10) as i32;
            (format!("{prefix} {creature}"), rng.gen_range(3..=8) + extra)
        }
        QuestType::Collect => {
            let prefix = naming::pick(rng, &genre.item_prefixes, "Old");
            let relic = naming::epithet(rng, style);
            (format!("{prefix} relic of {relic}"), rng.gen_range(2..=6))
        }
        QuestType::Escort => {
            let person = naming::person_name(rng, style);
            (person, 1)
        }
        QuestType::Explore => (naming::location_name(rng, genre), 1),
        QuestType::Talk => {
            let person = naming::person_name(rng, style);
            let role = naming::role_noun(rng, style);
            (format!("{person} the {role}"), 1)
        }
        QuestType::Boss => {
            let person = naming::person_name(rng, style);
            let creature = naming::creature_noun(rng, style);
            (format!("{person}, {creature} Lord"), 1)
        }
    };

    let description = if required > 1 {
        format!("{} {} {}", quest_type.verb(), required, target)
    } else {
        format!("{} {}", quest_type.verb(), target)
    };

    QuestObjective {
        description,
        target,
        required,
        current: 0,
    }
}

impl Generator for QuestGenerator {
    type Output = GeneratedQuest;
    type Filter = QuestType;

    fn generate(
        &self,
        seed: u64,
        params: &GenerationParams<QuestType>,
    ) -> ForgeResult<Vec<GeneratedQuest>> {
        let genre = self.registry.require(&params.genre_id)?;
        let count = params.count_or(config::DEFAULT_QUEST_COUNT);
        log::debug!(
            "generating {} quests with seed {} (depth {}, difficulty {}, genre {})",
            count,
            seed,
            params.depth,
            params.difficulty,
            params.genre_id
        );

        (0..count as u64)
            .map(|i| self.build_quest(utils::derive_seed(seed, i), params, genre))
            .collect()
    }

    fn validate(
        &self,
        quests: &[GeneratedQuest],
        params: &GenerationParams<QuestType>,
    ) -> ForgeResult<()> {
        let generator = self.generator_type();
        check_non_empty(generator, quests, params.count_or(config::DEFAULT_QUEST_COUNT))?;

        for (index, quest) in quests.iter().enumerate() {
            check_name(generator, index, &quest.name)?;
            let name = quest.name.as_str();

            if quest.objectives.is_empty() {
                return Err(violation(generator, index, name, "quest has no objectives"));
            }
            for objective in &quest.objectives {
                if objective.required < 1 {
                    return Err(violation(
                        generator,
                        index,
                        name,
                        format!("objective '{}' requires nothing", objective.description),
                    ));
                }
                if objective.current < 0 || objective.current > objective.required {
                    return Err(violation(
                        generator,
                        index,
                        name,
                        format!(
                            "objective '{}' progress {} outside 0..={}",
                            objective.description, objective.current, objective.required
                        ),
                    ));
                }
            }

            check_int(generator, index, name, "xp", quest.reward.xp)?;
            check_int(generator, index, name, "gold", quest.reward.gold)?;
            check_int(generator, index, name, "skill_points", quest.reward.skill_points)?;
            check_int(generator, index, name, "required_level", quest.required_level)?;

            if let Some(filter) = params.type_filter {
                if quest.quest_type != filter {
                    return Err(violation(
                        generator,
                        index,
                        name,
                        format!("{:?} does not match filter {:?}", quest.quest_type, filter),
                    ));
                }
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "QuestGenerator"
    }
}

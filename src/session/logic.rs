//! Exploration session: party position, movement, encounters and trading.

use super::encounter::build_roster;
use crate::character::Hero;
use crate::combat::{resolve_battle, BattleOutcome, BattleReport};
use crate::core::config::GameConfig;
use crate::core::decisions::DecisionSource;
use crate::core::error::{GameError, TargetKind};
use crate::core::events::{BlockReason, EventSink, GameEvent};
use crate::items::{market, Item};
use crate::map::{generate_map, Direction, GameMap, Position, TileType};
use crate::templates::TemplateCatalog;
use rand::Rng;
use tracing::{debug, info};

/// Result of one movement intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Blocked {
        reason: BlockReason,
    },
    Moved {
        tile: TileType,
        /// Report of the battle fought on arrival, if one was triggered.
        encounter: Option<BattleReport>,
    },
}

impl MoveOutcome {
    pub fn encounter_triggered(&self) -> bool {
        matches!(
            self,
            MoveOutcome::Moved {
                encounter: Some(_),
                ..
            }
        )
    }
}

pub struct Session {
    map: GameMap,
    position: Position,
    party: Vec<Hero>,
    catalog: TemplateCatalog,
    config: GameConfig,
    over: bool,
}

impl Session {
    /// A session on an existing map, party standing at the origin.
    pub fn new(map: GameMap, party: Vec<Hero>, catalog: TemplateCatalog, config: GameConfig) -> Self {
        Self {
            map,
            position: (0, 0),
            party,
            catalog,
            config,
            over: false,
        }
    }

    /// Validates the config, picks the party and generates a fresh map.
    pub fn new_game(
        config: GameConfig,
        catalog: TemplateCatalog,
        party_indices: &[usize],
        rng: &mut impl Rng,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let party = catalog.select_party(party_indices, config.max_party_size)?;
        let map = generate_map(config.map_size, config.map_size, &config, rng)?;
        info!(
            size = config.map_size,
            party = party.len(),
            markets = map.count(TileType::Market),
            "new game started"
        );
        Ok(Self::new(map, party, catalog, config))
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn party(&self) -> &[Hero] {
        &self.party
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// True once the party has been defeated.
    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn current_tile(&self) -> Option<TileType> {
        self.map.tile(self.position)
    }

    pub fn render(&self) -> String {
        self.map.render(self.position)
    }

    /// Moves the party one tile. Landing on Common land may start a battle,
    /// which is fought to completion before this returns.
    pub fn on_move(
        &mut self,
        direction: Direction,
        rng: &mut impl Rng,
        decisions: &mut dyn DecisionSource,
        sink: &mut dyn EventSink,
    ) -> Result<MoveOutcome, GameError> {
        if self.over {
            return Err(GameError::GameOver);
        }

        let Some(next) = self.map.step(self.position, direction) else {
            return Ok(self.blocked(BlockReason::OffMap, sink));
        };
        let tile = match self.map.tile(next) {
            Some(tile) if tile.is_accessible() => tile,
            _ => return Ok(self.blocked(BlockReason::Inaccessible, sink)),
        };

        self.position = next;
        sink.emit(GameEvent::TileEntered {
            position: next,
            tile,
        });

        let encounter = match tile {
            TileType::Market => {
                sink.emit(GameEvent::MarketReached);
                None
            }
            TileType::Common if rng.gen::<f64>() < self.config.encounter_probability() => {
                self.fight_encounter(rng, decisions, sink)
            }
            _ => None,
        };

        Ok(MoveOutcome::Moved { tile, encounter })
    }

    fn blocked(&self, reason: BlockReason, sink: &mut dyn EventSink) -> MoveOutcome {
        debug!(?reason, position = ?self.position, "move blocked");
        sink.emit(GameEvent::MoveBlocked { reason });
        MoveOutcome::Blocked { reason }
    }

    fn fight_encounter(
        &mut self,
        rng: &mut impl Rng,
        decisions: &mut dyn DecisionSource,
        sink: &mut dyn EventSink,
    ) -> Option<BattleReport> {
        let mut roster = build_roster(&self.party, &self.catalog, rng);
        if roster.is_empty() {
            return None;
        }

        info!(position = ?self.position, monsters = roster.len(), "encounter triggered");
        sink.emit(GameEvent::EncounterTriggered {
            monsters: roster.iter().map(|m| m.name.clone()).collect(),
        });

        let report = resolve_battle(&mut self.party, &mut roster, rng, decisions, sink);
        if report.outcome == BattleOutcome::HeroesDefeated {
            info!(rounds = report.rounds, "party defeated, game over");
            self.over = true;
        }
        Some(report)
    }

    /// Trading needs the party on a Market tile.
    pub fn can_trade(&self) -> Result<(), GameError> {
        if self.over {
            return Err(GameError::GameOver);
        }
        match self.current_tile() {
            Some(TileType::Market) => Ok(()),
            _ => Err(GameError::NoValidTarget(TargetKind::Market)),
        }
    }

    pub fn market_stock(&self) -> Vec<Item> {
        self.catalog.all_items()
    }

    fn hero_mut(&mut self, hero: usize) -> Result<&mut Hero, GameError> {
        let max = self.party.len();
        self.party.get_mut(hero).ok_or(GameError::InvalidSelection {
            choice: hero as i64 + 1,
            max,
        })
    }

    /// Buys `item` for the hero at `hero`. Returns the hero's remaining gold.
    pub fn buy(&mut self, hero: usize, item: &Item, sink: &mut dyn EventSink) -> Result<u32, GameError> {
        self.can_trade()?;
        let buyer = self.hero_mut(hero)?;
        let gold_left = market::buy(buyer, item)?;
        sink.emit(GameEvent::ItemBought {
            hero: buyer.name.clone(),
            item: item.name().to_string(),
            gold_left,
        });
        Ok(gold_left)
    }

    /// Sells the inventory entry at `index`. Returns the price paid.
    pub fn sell(&mut self, hero: usize, index: usize, sink: &mut dyn EventSink) -> Result<u32, GameError> {
        self.can_trade()?;
        let seller = self.hero_mut(hero)?;
        let (item, price) = market::sell(seller, index)?;
        sink.emit(GameEvent::ItemSold {
            hero: seller.name.clone(),
            item: item.name().to_string(),
            price,
        });
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Attributes, HeroClass};
    use crate::core::decisions::ScriptedDecisions;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use TileType::{Common as C, Inaccessible as X, Market as M};

    fn session(encounter_chance: f64) -> Session {
        let map = GameMap::from_tiles(vec![
            vec![C, M, X],
            vec![C, X, C],
            vec![C, C, C],
        ])
        .unwrap();
        let party = vec![Hero::new("Solo", HeroClass::Warrior, 1, Attributes::default()).with_gold(600)];
        let config = GameConfig {
            encounter_chance,
            ..GameConfig::default()
        };
        Session::new(map, party, TemplateCatalog::builtin().unwrap(), config)
    }

    fn walk(s: &mut Session, dir: Direction, events: &mut Vec<GameEvent>) -> MoveOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut script = ScriptedDecisions::default();
        s.on_move(dir, &mut rng, &mut script, events).unwrap()
    }

    #[test]
    fn test_blocked_moves_keep_position() {
        let mut s = session(0.0);
        let mut events = Vec::new();
        assert_eq!(
            walk(&mut s, Direction::Up, &mut events),
            MoveOutcome::Blocked {
                reason: BlockReason::OffMap
            }
        );
        s.position = (1, 0);
        assert_eq!(
            walk(&mut s, Direction::Right, &mut events),
            MoveOutcome::Blocked {
                reason: BlockReason::Inaccessible
            }
        );
        assert_eq!(s.position(), (1, 0));
    }

    #[test]
    fn test_market_reached_and_trading() {
        let mut s = session(0.0);
        let mut events = Vec::new();
        assert_eq!(
            s.can_trade(),
            Err(GameError::NoValidTarget(TargetKind::Market))
        );

        let outcome = walk(&mut s, Direction::Right, &mut events);
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                tile: M,
                encounter: None
            }
        );
        assert!(events.contains(&GameEvent::MarketReached));
        assert!(s.can_trade().is_ok());

        let sword = s.market_stock()[0].clone();
        assert_eq!(s.buy(0, &sword, &mut events), Ok(100));
        assert_eq!(s.sell(0, 0, &mut events), Ok(250));
        assert_eq!(s.party()[0].gold, 350);
        assert!(s.buy(3, &sword, &mut events).is_err());
    }

    #[test]
    fn test_peaceful_walk_never_fights() {
        let mut s = session(0.0);
        let mut events = Vec::new();
        for dir in [Direction::Down, Direction::Down, Direction::Right, Direction::Right] {
            assert!(!walk(&mut s, dir, &mut events).encounter_triggered());
        }
        assert_eq!(s.position(), (2, 2));
    }

    #[test]
    fn test_certain_encounter_on_common_tile() {
        let mut s = session(1.0);
        let mut events = Vec::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // Keep attacking until one side falls
        let mut script = ScriptedDecisions::new(std::iter::repeat(1).take(500));
        let outcome = s
            .on_move(Direction::Down, &mut rng, &mut script, &mut events)
            .unwrap();
        assert!(outcome.encounter_triggered());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::EncounterTriggered { monsters } if monsters.len() == 1)));
    }

    #[test]
    fn test_moves_after_defeat_are_game_over() {
        let mut s = session(0.0);
        s.over = true;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut script = ScriptedDecisions::default();
        let mut events = Vec::new();
        assert_eq!(
            s.on_move(Direction::Down, &mut rng, &mut script, &mut events),
            Err(GameError::GameOver)
        );
    }

    #[test]
    fn test_new_game_validates_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let catalog = TemplateCatalog::builtin().unwrap();
        assert!(matches!(
            Session::new_game(GameConfig::with_map_size(3), catalog.clone(), &[0], &mut rng),
            Err(GameError::InvalidMapSize { .. })
        ));
        let s = Session::new_game(GameConfig::with_map_size(6), catalog, &[0, 2], &mut rng).unwrap();
        assert_eq!(s.position(), (0, 0));
        assert_eq!(s.current_tile(), Some(C));
        assert_eq!(s.party().len(), 2);
        assert!(s.map().is_connected());
    }
}

// src/domain/blinds.rs

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Один уровень блайндов.
/// Пример: level = 3, SB = 25, BB = 50, ante = 5.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlindLevel {
    /// Порядковый номер уровня (1, 2, 3, ...).
    pub level: u32,
    /// Малый блайнд.
    pub small_blind: Chips,
    /// Большой блайнд.
    pub big_blind: Chips,
    /// Анте с каждого игрока (0, если нет).
    pub ante: Chips,
}

impl BlindLevel {
    pub const fn new(level: u32, small_blind: u64, big_blind: u64, ante: u64) -> Self {
        Self {
            level,
            small_blind: Chips(small_blind),
            big_blind: Chips(big_blind),
            ante: Chips(ante),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.small_blind.0 == 0 {
            return Err(format!("BlindLevel {}: small_blind = 0", self.level));
        }
        if self.big_blind.0 < self.small_blind.0 {
            return Err(format!(
                "BlindLevel {}: big_blind ({}) < small_blind ({})",
                self.level, self.big_blind.0, self.small_blind.0
            ));
        }
        Ok(())
    }
}

/// Таблица уровней блайндов турнира. Уровни идут строго по возрастанию.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlindStructure {
    pub levels: Vec<BlindLevel>,
}

impl BlindStructure {
    pub fn new(levels: Vec<BlindLevel>) -> Self {
        Self { levels }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.levels.is_empty() {
            return Err("BlindStructure: empty levels".into());
        }

        let mut expected_level = 1u32;
        let mut prev_bb = Chips::ZERO;
        for lvl in &self.levels {
            lvl.validate()?;
            if lvl.level != expected_level {
                return Err(format!(
                    "BlindStructure: expected level {}, got {}",
                    expected_level, lvl.level
                ));
            }
            if lvl.big_blind < prev_bb {
                return Err(format!("BlindStructure: level {} decreases big blind", lvl.level));
            }
            prev_bb = lvl.big_blind;
            expected_level += 1;
        }

        Ok(())
    }

    pub fn first_level(&self) -> Option<&BlindLevel> {
        self.levels.first()
    }

    pub fn level_by_number(&self, number: u32) -> Option<&BlindLevel> {
        self.levels.iter().find(|lvl| lvl.level == number)
    }

    /// Следующий уровень после `number`. На последнем уровне – None
    /// (структура не уменьшается и не "зацикливается").
    pub fn next_level(&self, number: u32) -> Option<&BlindLevel> {
        self.level_by_number(number.saturating_add(1))
    }

    /// Найти уровень по размерам блайндов (используется при восстановлении
    /// турнира из истории раздач, когда нет турнирной сводки).
    ///
    /// Сначала ищем точное совпадение SB/BB/ante, затем – только по SB/BB.
    pub fn level_for_blinds(&self, small_blind: Chips, big_blind: Chips, ante: Chips) -> Option<u32> {
        self.levels
            .iter()
            .find(|l| l.small_blind == small_blind && l.big_blind == big_blind && l.ante == ante)
            .or_else(|| {
                self.levels
                    .iter()
                    .find(|l| l.small_blind == small_blind && l.big_blind == big_blind)
            })
            .map(|l| l.level)
    }

    /// Стандартная турнирная структура (SNG).
    pub fn standard_tournament() -> Self {
        let levels = vec![
            BlindLevel::new(1, 10, 20, 0),
            BlindLevel::new(2, 15, 30, 0),
            BlindLevel::new(3, 25, 50, 0),
            BlindLevel::new(4, 50, 100, 0),
            BlindLevel::new(5, 75, 150, 15),
            BlindLevel::new(6, 100, 200, 25),
            BlindLevel::new(7, 150, 300, 25),
            BlindLevel::new(8, 200, 400, 50),
            BlindLevel::new(9, 300, 600, 75),
            BlindLevel::new(10, 400, 800, 100),
            BlindLevel::new(11, 500, 1000, 100),
            BlindLevel::new(12, 700, 1400, 200),
            BlindLevel::new(13, 1000, 2000, 300),
            BlindLevel::new(14, 1500, 3000, 400),
            BlindLevel::new(15, 2000, 4000, 500),
        ];

        BlindStructure { levels }
    }
}

impl Default for BlindStructure {
    fn default() -> Self {
        Self::standard_tournament()
    }
}

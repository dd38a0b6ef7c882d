//! Job configuration resolved from the printer's marked option choices.
//!
//! The PPD exposes two keywords, `CashDrawer` and `Beeper`. Each marked
//! choice names a peripheral action and the phase it fires in, e.g.
//! `CashDrawer12BeforePrint` or `Beep3t300AfterPrint`. Choices are resolved
//! once at job start; a missing or unknown choice means "no trigger" and
//! never fails the job.

use log::debug;

use crate::command;

/// When a peripheral trigger fires relative to the printed pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerPhase {
    BeforePrint,
    AfterPrint,
}

/// Which cash drawer solenoids to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerMode {
    Off,
    Drawer1,
    Drawer2,
    /// Both drawers, drawer 1 first.
    Both,
}

/// Which beep pattern to sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeeperMode {
    Off,
    /// Three beeps, 200 ms apart.
    Beep3t200,
    /// Three beeps, 300 ms apart.
    Beep3t300,
}

/// An ordered set of raw trigger opcodes, fired in sequence.
pub type TriggerSet = Vec<&'static [u8]>;

/// Named-choice lookup, the shape of a marked PPD option.
pub trait ChoiceSource {
    /// The marked choice for `keyword`, if any.
    fn choice(&self, keyword: &str) -> Option<&str>;
}

/// Option pairs parsed from the filter's options argument.
///
/// Stands in for the marked PPD choices; the scheduler passes the same
/// `keyword=choice` pairs on the command line.
#[derive(Debug, Default)]
pub struct OptionList {
    pairs: Vec<(String, String)>,
}

impl OptionList {
    /// Parse a whitespace-separated list of `keyword=choice` options.
    ///
    /// Entries without a value select nothing and are ignored.
    pub fn parse(options: &str) -> Self {
        let mut pairs = Vec::new();
        for option in options.split_whitespace() {
            match option.split_once('=') {
                Some((keyword, choice)) => pairs.push((keyword.to_string(), choice.to_string())),
                None => debug!("ignoring valueless option {:?}", option),
            }
        }
        OptionList { pairs }
    }
}

impl ChoiceSource for OptionList {
    fn choice(&self, keyword: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key.as_str() == keyword)
            .map(|(_, choice)| choice.as_str())
    }
}

/// The resolved peripheral choices for one job, immutable once built.
#[derive(Debug, Clone, Copy)]
pub struct JobOptions {
    drawer: DrawerMode,
    drawer_phase: TriggerPhase,
    beeper: BeeperMode,
    beeper_phase: TriggerPhase,
}

impl Default for JobOptions {
    /// No triggers at all, the behavior when no configuration is present.
    fn default() -> Self {
        JobOptions {
            drawer: DrawerMode::Off,
            drawer_phase: TriggerPhase::BeforePrint,
            beeper: BeeperMode::Off,
            beeper_phase: TriggerPhase::BeforePrint,
        }
    }
}

impl JobOptions {
    pub fn new(
        drawer: DrawerMode,
        drawer_phase: TriggerPhase,
        beeper: BeeperMode,
        beeper_phase: TriggerPhase,
    ) -> Self {
        JobOptions {
            drawer,
            drawer_phase,
            beeper,
            beeper_phase,
        }
    }

    /// Resolve the `CashDrawer` and `Beeper` choices from `source`.
    pub fn resolve<C: ChoiceSource>(source: &C) -> Self {
        let mut options = JobOptions::default();

        if let Some(choice) = source.choice("CashDrawer") {
            match split_phase(choice) {
                Some(("CashDrawer1", phase)) => {
                    options.drawer = DrawerMode::Drawer1;
                    options.drawer_phase = phase;
                }
                Some(("CashDrawer2", phase)) => {
                    options.drawer = DrawerMode::Drawer2;
                    options.drawer_phase = phase;
                }
                Some(("CashDrawer12", phase)) => {
                    options.drawer = DrawerMode::Both;
                    options.drawer_phase = phase;
                }
                _ => debug!("no trigger for CashDrawer choice {:?}", choice),
            }
        }

        if let Some(choice) = source.choice("Beeper") {
            match split_phase(choice) {
                Some(("Beep3t200", phase)) => {
                    options.beeper = BeeperMode::Beep3t200;
                    options.beeper_phase = phase;
                }
                Some(("Beep3t300", phase)) => {
                    options.beeper = BeeperMode::Beep3t300;
                    options.beeper_phase = phase;
                }
                _ => debug!("no trigger for Beeper choice {:?}", choice),
            }
        }

        debug!("resolved job options: {:?}", options);
        options
    }

    /// The opcodes to fire at `phase`: cash drawer first, then beeper.
    pub fn triggers(&self, phase: TriggerPhase) -> TriggerSet {
        let mut set = TriggerSet::new();

        if self.drawer_phase == phase {
            match self.drawer {
                DrawerMode::Off => {}
                DrawerMode::Drawer1 => set.push(command::DRAWER_1),
                DrawerMode::Drawer2 => set.push(command::DRAWER_2),
                DrawerMode::Both => {
                    set.push(command::DRAWER_1);
                    set.push(command::DRAWER_2);
                }
            }
        }

        if self.beeper_phase == phase {
            match self.beeper {
                BeeperMode::Off => {}
                BeeperMode::Beep3t200 => set.push(command::BEEP_3T200),
                BeeperMode::Beep3t300 => set.push(command::BEEP_3T300),
            }
        }

        set
    }
}

/// Split a choice name into its action stem and trigger phase.
fn split_phase(choice: &str) -> Option<(&str, TriggerPhase)> {
    if let Some(stem) = choice.strip_suffix("BeforePrint") {
        Some((stem, TriggerPhase::BeforePrint))
    } else if let Some(stem) = choice.strip_suffix("AfterPrint") {
        Some((stem, TriggerPhase::AfterPrint))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyword_choice_pairs() {
        let list = OptionList::parse(" CashDrawer=CashDrawer1BeforePrint  Beeper=Beep3t200AfterPrint ");
        assert_eq!(list.choice("CashDrawer"), Some("CashDrawer1BeforePrint"));
        assert_eq!(list.choice("Beeper"), Some("Beep3t200AfterPrint"));
        assert_eq!(list.choice("PageSize"), None);
    }

    #[test]
    fn valueless_options_are_ignored() {
        let list = OptionList::parse("Collate CashDrawer=CashDrawer2AfterPrint");
        assert_eq!(list.choice("Collate"), None);
        assert_eq!(list.choice("CashDrawer"), Some("CashDrawer2AfterPrint"));
    }

    #[test]
    fn absent_choices_resolve_to_no_triggers() {
        let options = JobOptions::resolve(&OptionList::parse(""));
        assert!(options.triggers(TriggerPhase::BeforePrint).is_empty());
        assert!(options.triggers(TriggerPhase::AfterPrint).is_empty());
    }

    #[test]
    fn unknown_choices_resolve_to_no_triggers() {
        let list = OptionList::parse("CashDrawer=None Beeper=Never");
        let options = JobOptions::resolve(&list);
        assert!(options.triggers(TriggerPhase::BeforePrint).is_empty());
        assert!(options.triggers(TriggerPhase::AfterPrint).is_empty());
    }

    #[test]
    fn both_drawers_fire_in_order_before_print() {
        let list = OptionList::parse("CashDrawer=CashDrawer12BeforePrint");
        let options = JobOptions::resolve(&list);
        let set = options.triggers(TriggerPhase::BeforePrint);
        assert_eq!(set, vec![command::DRAWER_1, command::DRAWER_2]);
        assert!(options.triggers(TriggerPhase::AfterPrint).is_empty());
    }

    #[test]
    fn drawer_fires_before_beeper_in_the_same_phase() {
        let list = OptionList::parse("CashDrawer=CashDrawer2AfterPrint Beeper=Beep3t300AfterPrint");
        let options = JobOptions::resolve(&list);
        let set = options.triggers(TriggerPhase::AfterPrint);
        assert_eq!(set, vec![command::DRAWER_2, command::BEEP_3T300]);
        assert!(options.triggers(TriggerPhase::BeforePrint).is_empty());
    }

    #[test]
    fn phases_are_independent() {
        let list = OptionList::parse("CashDrawer=CashDrawer1BeforePrint Beeper=Beep3t200AfterPrint");
        let options = JobOptions::resolve(&list);
        assert_eq!(options.triggers(TriggerPhase::BeforePrint), vec![command::DRAWER_1]);
        assert_eq!(options.triggers(TriggerPhase::AfterPrint), vec![command::BEEP_3T200]);
    }
}

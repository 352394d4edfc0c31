//! The downstream interface fed with complete records.

use crate::record::{Element, Examples, Feature, Record, Step};

/// Receives one complete record per document element, in source order,
/// followed by a single [`eof`](Formatter::eof).
pub trait Formatter {
    /// The feature header, with its comments, tags and description.
    fn feature(&mut self, feature: Feature);
    /// The background header.
    fn background(&mut self, background: Element);
    /// A scenario header.
    fn scenario(&mut self, scenario: Element);
    /// A scenario outline header.
    fn scenario_outline(&mut self, outline: Element);
    /// An examples block, table included.
    fn examples(&mut self, examples: Examples);
    /// A step, trailing table or text block included.
    fn step(&mut self, step: Step);
    /// The end of the document; nothing follows.
    fn eof(&mut self);
}

impl<F: Formatter + ?Sized> Formatter for &mut F {
    fn feature(&mut self, feature: Feature) {
        (**self).feature(feature);
    }

    fn background(&mut self, background: Element) {
        (**self).background(background);
    }

    fn scenario(&mut self, scenario: Element) {
        (**self).scenario(scenario);
    }

    fn scenario_outline(&mut self, outline: Element) {
        (**self).scenario_outline(outline);
    }

    fn examples(&mut self, examples: Examples) {
        (**self).examples(examples);
    }

    fn step(&mut self, step: Step) {
        (**self).step(step);
    }

    fn eof(&mut self) {
        (**self).eof();
    }
}

/// Records every call.
impl Formatter for Vec<Record> {
    fn feature(&mut self, feature: Feature) {
        self.push(Record::Feature(feature));
    }

    fn background(&mut self, background: Element) {
        self.push(Record::Background(background));
    }

    fn scenario(&mut self, scenario: Element) {
        self.push(Record::Scenario(scenario));
    }

    fn scenario_outline(&mut self, outline: Element) {
        self.push(Record::ScenarioOutline(outline));
    }

    fn examples(&mut self, examples: Examples) {
        self.push(Record::Examples(examples));
    }

    fn step(&mut self, step: Step) {
        self.push(Record::Step(step));
    }

    fn eof(&mut self) {
        self.push(Record::Eof);
    }
}

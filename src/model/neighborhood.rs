use super::{Lane, Node};
use serde::{Deserialize, Serialize};

/// The classified direct links of one focal node.
///
/// Lists hold every neighbor returned by the API, unpaginated. Pagination is a
/// property of the view built from them, never of the neighborhood itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Neighborhood {
    pub focal: Node,
    pub input_data: Vec<Node>,
    pub input_process: Vec<Node>,
    pub output_data: Vec<Node>,
    pub output_process: Vec<Node>,
}

impl Neighborhood {
    pub fn new(focal: Node) -> Self {
        Self {
            focal,
            input_data: Vec::new(),
            input_process: Vec::new(),
            output_data: Vec::new(),
            output_process: Vec::new(),
        }
    }

    pub fn lane(&self, lane: Lane) -> &[Node] {
        match lane {
            Lane::InputData => &self.input_data,
            Lane::InputProcess => &self.input_process,
            Lane::OutputData => &self.output_data,
            Lane::OutputProcess => &self.output_process,
        }
    }

    pub fn lane_mut(&mut self, lane: Lane) -> &mut Vec<Node> {
        match lane {
            Lane::InputData => &mut self.input_data,
            Lane::InputProcess => &mut self.input_process,
            Lane::OutputData => &mut self.output_data,
            Lane::OutputProcess => &mut self.output_process,
        }
    }

    /// Whether the lane holds more neighbors than fit on one page.
    pub fn has_more(&self, lane: Lane, page_size: usize) -> bool {
        self.lane(lane).len() > page_size
    }

    pub fn total(&self) -> usize {
        Lane::ALL.iter().map(|lane| self.lane(*lane).len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_more_only_past_a_full_page() {
        let mut neighborhood = Neighborhood::new(Node::new("f", "data.core.int.Int."));
        for i in 0..3 {
            neighborhood
                .output_process
                .push(Node::new(format!("c{}", i), "process.calculation.calcjob.CalcJobNode."));
        }

        assert!(neighborhood.has_more(Lane::OutputProcess, 2));
        assert!(!neighborhood.has_more(Lane::OutputProcess, 3));
        assert!(!neighborhood.has_more(Lane::InputData, 0));
        assert_eq!(neighborhood.total(), 3);
    }
}

pub mod diagram;

pub use diagram::{Diagram, DiagramEdge, DiagramNode, END_ID, START_ID};

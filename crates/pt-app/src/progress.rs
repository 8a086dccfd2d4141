#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    CompilingBoard,
    MappingLoads,
    EstimatingAmbient,
    Assembling,
    Solving,
    Completed,
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::CompilingBoard => "compiling board",
            RunStage::MappingLoads => "mapping loads",
            RunStage::EstimatingAmbient => "estimating ambient",
            RunStage::Assembling => "assembling",
            RunStage::Solving => "solving",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

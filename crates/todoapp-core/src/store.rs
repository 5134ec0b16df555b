use todoapp_shared::{
  TaskDto,
  TaskId,
  TaskPriority
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum TaskState {
  Pending,
  Complete
}

impl TaskState {
  pub fn from_completed(
    completed: bool
  ) -> Self {
    if completed {
      Self::Complete
    } else {
      Self::Pending
    }
  }

  pub fn is_complete(self) -> bool {
    self == Self::Complete
  }

  pub fn toggled(self) -> Self {
    match self {
      | Self::Pending => Self::Complete,
      | Self::Complete => Self::Pending
    }
  }
}

/// One rendered task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
  pub id:          TaskId,
  pub title:       String,
  pub description: String,
  pub priority:    Option<TaskPriority>,
  pub due_date:    Option<String>,
  pub state:       TaskState,
  pub visible:     bool,
  pub removing:    bool
}

impl From<TaskDto> for TaskNode {
  fn from(task: TaskDto) -> Self {
    let priority = task.priority();
    Self {
      id: task.id,
      title: task.title,
      description: task
        .description
        .unwrap_or_default(),
      priority,
      due_date: task.due_date,
      state: TaskState::from_completed(
        task.completed
      ),
      visible: true,
      removing: false
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct Counters {
  pub total:      usize,
  pub completed:  usize,
  pub incomplete: usize
}

/// The rendered task list, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
  nodes: Vec<TaskNode>
}

impl TaskStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn nodes(&self) -> &[TaskNode] {
    &self.nodes
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn get(
    &self,
    id: &TaskId
  ) -> Option<&TaskNode> {
    self
      .nodes
      .iter()
      .find(|node| &node.id == id)
  }

  pub fn ids(&self) -> Vec<TaskId> {
    self
      .nodes
      .iter()
      .map(|node| node.id.clone())
      .collect()
  }

  /// Drop everything and rebuild from a server listing, keeping its
  /// order.
  pub fn replace_all(
    &mut self,
    tasks: Vec<TaskDto>
  ) {
    self.nodes = tasks
      .into_iter()
      .map(TaskNode::from)
      .collect();
  }

  pub fn append(&mut self, task: TaskDto) {
    self.nodes.push(TaskNode::from(task));
  }

  /// Flip a node's state and return the resulting completion flag.
  pub fn toggle(
    &mut self,
    id: &TaskId
  ) -> Option<bool> {
    let node = self.get_mut(id)?;
    node.state = node.state.toggled();
    Some(node.state.is_complete())
  }

  pub fn mark_removing(
    &mut self,
    id: &TaskId
  ) -> bool {
    match self.get_mut(id) {
      | Some(node) => {
        node.removing = true;
        true
      }
      | None => false
    }
  }

  pub fn remove(
    &mut self,
    id: &TaskId
  ) -> Option<TaskNode> {
    let index = self
      .nodes
      .iter()
      .position(|node| &node.id == id)?;
    Some(self.nodes.remove(index))
  }

  pub fn clear(&mut self) {
    self.nodes.clear();
  }

  pub fn counters(&self) -> Counters {
    let total = self.nodes.len();
    let completed = self
      .nodes
      .iter()
      .filter(|node| node.state.is_complete())
      .count();
    Counters {
      total,
      completed,
      incomplete: total - completed
    }
  }

  pub(crate) fn nodes_mut(
    &mut self
  ) -> impl Iterator<Item = &mut TaskNode> {
    self.nodes.iter_mut()
  }

  fn get_mut(
    &mut self,
    id: &TaskId
  ) -> Option<&mut TaskNode> {
    self
      .nodes
      .iter_mut()
      .find(|node| &node.id == id)
  }
}

use todoapp_core::TaskNode;
use todoapp_shared::TaskId;
use web_sys::TransitionEvent;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
  pub node:       TaskNode,
  pub busy:       bool,
  pub on_toggle:  Callback<TaskId>,
  pub on_delete:  Callback<TaskId>,
  pub on_removed: Callback<TaskId>
}

#[function_component(TaskRow)]
pub fn task_row(
  props: &TaskRowProps
) -> Html {
  let node = &props.node;
  let completed =
    node.state.is_complete();

  let on_toggle = {
    let on_toggle =
      props.on_toggle.clone();
    let id = node.id.clone();
    Callback::from(move |_: MouseEvent| {
      on_toggle.emit(id.clone())
    })
  };
  let on_delete = {
    let on_delete =
      props.on_delete.clone();
    let id = node.id.clone();
    Callback::from(move |_: MouseEvent| {
      on_delete.emit(id.clone())
    })
  };
  let on_transition_end = {
    let on_removed =
      props.on_removed.clone();
    let id = node.id.clone();
    let removing = node.removing;
    Callback::from(
      move |_: TransitionEvent| {
        if removing {
          on_removed.emit(id.clone());
        }
      }
    )
  };

  let class = classes!(
    "todo",
    completed.then_some("completed"),
    node.removing.then_some("slide"),
    (!node.visible).then_some("hidden")
  );
  let style = if node.visible {
    ""
  } else {
    "display:none"
  };

  html! {
      <li
          class={class}
          style={style}
          data-id={node.id.to_string()}
          ontransitionend={on_transition_end}
      >
          <span class="todo-item">{ &node.title }</span>
          <button
              class="complete-btn"
              title={if completed { "Mark incomplete" } else { "Mark complete" }}
              disabled={props.busy || node.removing}
              onclick={on_toggle}
          >
              <i class="fas fa-check"></i>
          </button>
          <button
              class="trash-btn"
              title="Delete"
              disabled={props.busy || node.removing}
              onclick={on_delete}
          >
              <i class="fas fa-trash"></i>
          </button>
      </li>
  }
}

pub mod diagram_editor;

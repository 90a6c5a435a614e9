//! Optional seeding of the type registry with Qt widget classes, registered
//! as pointer types (`QWidget` maps to `QWidget *`).

use crate::types::TypeRegistry;

const QT_CLASSES: &[&str] = &[
    "QObject",
    "QWidget",
    "QString",
    "QStringList",
    "QApplication",
    "QMainWindow",
    "QDialog",
    "QPushButton",
    "QLabel",
    "QLineEdit",
    "QTextEdit",
    "QCheckBox",
    "QRadioButton",
    "QComboBox",
    "QListWidget",
    "QTableWidget",
    "QTreeWidget",
    "QTreeView",
    "QListView",
    "QTableView",
    "QAbstractItemModel",
    "QStandardItemModel",
    "QModelIndex",
    "QVariant",
    "QLayout",
    "QVBoxLayout",
    "QHBoxLayout",
    "QGridLayout",
    "QTimer",
    "QThread",
    "QFile",
    "QDir",
    "QUrl",
    "QPainter",
    "QPixmap",
    "QImage",
    "QIcon",
    "QFont",
    "QColor",
    "QAction",
    "QMenu",
    "QMenuBar",
    "QToolBar",
    "QStatusBar",
    "QMessageBox",
    "QFileDialog",
];

/// Register every known `Q*` class as a pointer type.
pub fn register_qt_types(registry: &mut TypeRegistry) {
    for name in QT_CLASSES {
        registry.register(*name, format!("{name} *"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qt_types_are_pointers() {
        let mut registry = TypeRegistry::with_builtins();
        register_qt_types(&mut registry);

        assert_eq!(registry.detect("QWidget", false), "QWidget *");
        assert_eq!(registry.detect("QString", true), "QString *");
    }
}
